use strum::{Display, EnumIter};

/// 對外提供的資料種類，每一種各自快取
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum RecordKind {
    /// 公司名稱、產業與交易所
    StockOverview,
    /// 最近一次股利、預估年化股利與殖利率
    DividendSnapshot,
    /// 歷年配息紀錄
    DividendHistory,
    /// 開收盤價、本益比與成交量
    Fundamentals,
}

/// 查詢結果：找到資料，或來源確定沒有這檔股票。
///
/// `Absent` 是正常結果而不是錯誤，HTTP 層會回應 404。
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Absent,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Absent => Lookup::Absent,
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Lookup<U>>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Found(value) => f(value),
            Lookup::Absent => Lookup::Absent,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lookup::Found(value),
            None => Lookup::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_record_kind_display() {
        let names: Vec<String> = RecordKind::iter().map(|kind| kind.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "StockOverview",
                "DividendSnapshot",
                "DividendHistory",
                "Fundamentals"
            ]
        );
    }

    #[test]
    fn test_lookup() {
        let found: Lookup<i32> = Some(2).into();
        assert!(found.is_found());
        assert_eq!(found.clone().map(|v| v * 2), Lookup::Found(4));
        assert_eq!(found.and_then(|_| Lookup::<i32>::Absent), Lookup::Absent);

        let absent: Lookup<i32> = None.into();
        assert!(!absent.is_found());
        assert_eq!(absent.found(), None);
    }
}
