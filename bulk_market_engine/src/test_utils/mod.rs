pub mod prepare_env;
pub mod seed;

pub use prepare_env::{create_database, prepare_test_env, random_db_path, run_migrations};
