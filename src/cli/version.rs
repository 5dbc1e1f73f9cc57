use std::env::consts::{ARCH, OS};

use anyhow::Result;

use crate::cnf::{PKG_NAME, PKG_VERSION};

pub fn init() -> Result<()> {
	println!("{PKG_NAME} {} for {OS} on {ARCH}", *PKG_VERSION);
	Ok(())
}
