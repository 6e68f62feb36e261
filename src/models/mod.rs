// src/models/mod.rs

pub mod exam_result;
pub mod profile;
pub mod question;
pub mod settings;
