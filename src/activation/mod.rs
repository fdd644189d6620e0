pub mod sigmoid;
