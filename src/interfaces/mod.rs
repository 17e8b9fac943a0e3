pub mod csv;
pub mod statement;
