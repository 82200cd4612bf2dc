mod handler;
mod model;

pub use handler::{
    create_category, create_sub_category, delete_category, delete_sub_category, list_categories,
    list_sub_categories, update_category, update_sub_category,
};
