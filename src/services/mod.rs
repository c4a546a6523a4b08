pub mod visitor_store;
