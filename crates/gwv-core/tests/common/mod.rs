pub mod checksum_server;
