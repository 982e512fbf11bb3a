mod common;
mod engine;
mod scorer;
