pub mod datachan;
pub mod network;
pub mod pasv;
pub mod port;
pub mod response;

#[cfg(test)]
mod test_session;
