pub mod errors;
pub mod db;
pub mod restaurant_table;
pub mod reservation;

#[cfg(test)]
mod tests;
