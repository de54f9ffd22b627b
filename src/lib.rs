//! Rysowanie, nazywanie i przeglądanie wielokątów na mapie w terminalu,
//! z listą przechowywaną w zdalnym API.

pub mod basemap;
pub mod config;
pub mod dialog;
pub mod draw;
pub mod geometry;
pub mod model;
pub mod screen;
pub mod store;
pub mod ui;
pub mod worker;
