//! File operations module for Viral Post
//!
//! This module provides the native pickers used to choose an avatar image
//! and the folder that downloaded screenshots are written to.

pub mod dialogs;
