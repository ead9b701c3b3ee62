pub mod session_id;
