//! Cross-module integration tests

mod frame_loop;
