pub mod cmbc;

pub use cmbc::CmbcProvider;
