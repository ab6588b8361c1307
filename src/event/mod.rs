pub mod fuel_price;
