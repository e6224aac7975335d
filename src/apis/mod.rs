pub mod easy_collision;
