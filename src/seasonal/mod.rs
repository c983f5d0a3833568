pub mod aggregate;
pub mod seasonal_frame;
