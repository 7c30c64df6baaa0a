pub mod haptics;
pub mod motion;
pub mod normalize;
pub mod pointer;
pub mod session;
pub mod state;
