pub mod check;
pub mod week;
