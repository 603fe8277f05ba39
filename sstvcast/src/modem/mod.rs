pub mod morse;
pub mod sstv;
