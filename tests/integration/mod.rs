mod cli_contracts;
mod store_persistence;
mod upload_lifecycle;
