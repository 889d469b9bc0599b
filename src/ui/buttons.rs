//! Central button construction helpers ensuring consistent styling.
use serenity::builder::CreateButton;
use serenity::model::application::ButtonStyle;

pub struct Btn;
impl Btn {
    pub fn primary(id: impl Into<String>, label: &str) -> CreateButton {
        CreateButton::new(id).label(label).style(ButtonStyle::Primary)
    }
    pub fn success(id: impl Into<String>, label: &str) -> CreateButton {
        CreateButton::new(id).label(label).style(ButtonStyle::Success)
    }
    pub fn secondary(id: impl Into<String>, label: &str) -> CreateButton {
        CreateButton::new(id)
            .label(label)
            .style(ButtonStyle::Secondary)
    }
    pub fn danger(id: impl Into<String>, label: &str) -> CreateButton {
        CreateButton::new(id).label(label).style(ButtonStyle::Danger)
    }
}
