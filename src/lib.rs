pub mod board;
pub mod controller;
pub mod coord;
pub mod engine;
pub mod error;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod piece;
