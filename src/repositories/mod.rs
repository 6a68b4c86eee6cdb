pub mod cache_repo;
