pub mod visit_error;
