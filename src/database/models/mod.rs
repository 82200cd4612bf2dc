pub mod category;
pub mod location;
pub mod user;
pub mod xozmak;

pub use category::{Category, CategoryUpdate, SubCategory, SubCategoryUpdate};
pub use location::UserLocation;
pub use user::{ProfileUpdate, UserAccount, UserProfile};
pub use xozmak::{Xozmak, XozmakUpdate};
