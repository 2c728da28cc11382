pub mod fixtures;

mod access;
mod management;
