pub mod character_select;
pub mod crafting;
pub mod helpers;
pub mod inventory;
pub mod loading;
pub mod scene;
