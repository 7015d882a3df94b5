#![cfg(test)]

mod disk;
mod interrupt;
mod keyboard;
mod progs;
mod protection;
