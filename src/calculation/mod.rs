/// 以預估年化股利與收盤價計算殖利率
pub mod dividend_yield;
