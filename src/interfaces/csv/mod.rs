pub mod operation_reader;
