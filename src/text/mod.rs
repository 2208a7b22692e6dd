pub mod layout;
pub mod word_list;
