#![allow(dead_code)]

pub mod providers;
