mod proxy_directory;

pub use proxy_directory::ProxyDirectory;
