mod dir_source;
mod fixtures;
mod http_source;
