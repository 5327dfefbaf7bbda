pub mod forecast_term;
pub mod parameter;
pub mod phenomenon;
pub mod resolution;
pub mod value_item;
