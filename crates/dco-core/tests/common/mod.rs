pub mod worker_server;
