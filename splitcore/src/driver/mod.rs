pub mod flex_pin;
