/// 美股股利資料網站
pub mod dividata;
