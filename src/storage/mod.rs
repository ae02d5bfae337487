pub mod interface;
pub mod sessions;
pub mod sockets;
