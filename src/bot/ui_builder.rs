//! UI Builder module for creating keyboards and static button sets

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::catalog::Category;

/// Create the category selection keyboard: one button per browsable
/// category, callback data carrying the raw category slug. The set is
/// static and does not reflect which categories currently hold records.
pub fn category_keyboard() -> InlineKeyboardMarkup {
    let buttons = Category::ALL
        .into_iter()
        .map(|category| vec![InlineKeyboardButton::callback(category.label(), category.slug())])
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(buttons)
}
