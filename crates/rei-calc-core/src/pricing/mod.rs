pub mod target_price;
