//! Maps transport-agnostic [`Menu`] values onto Discord action rows.

use serenity::builder::CreateActionRow;

use super::buttons::Btn;
use crate::dispatch::Menu;
use crate::interactions::ids;

// Discord allows at most five buttons per action row.
const ROW_WIDTH: usize = 5;

pub fn action_rows(menu: &Menu) -> Vec<CreateActionRow> {
    match menu {
        Menu::Main => vec![CreateActionRow::Buttons(vec![
            Btn::primary(ids::MENU_SEND, "Send"),
            Btn::secondary(ids::MENU_BALANCE, "Balances"),
            Btn::secondary(ids::MENU_HISTORY, "History"),
            Btn::danger(ids::MENU_LOGOUT, "Log out"),
        ])],
        Menu::Transfer => vec![CreateActionRow::Buttons(vec![
            Btn::primary(ids::TRANSFER_EMAIL, "To email"),
            Btn::primary(ids::TRANSFER_WALLET, "To wallet"),
            Btn::primary(ids::TRANSFER_BANK, "To bank"),
            Btn::danger(ids::TRANSFER_CANCEL, "Cancel"),
        ])],
        Menu::Networks(networks) => {
            let mut rows: Vec<CreateActionRow> = networks
                .chunks(ROW_WIDTH)
                .map(|chunk| {
                    CreateActionRow::Buttons(
                        chunk
                            .iter()
                            .map(|net| {
                                Btn::secondary(
                                    format!("{}{}", ids::TRANSFER_NETWORK_PREFIX, net),
                                    net,
                                )
                            })
                            .collect(),
                    )
                })
                .collect();
            rows.push(CreateActionRow::Buttons(vec![Btn::danger(
                ids::TRANSFER_CANCEL,
                "Cancel",
            )]));
            rows
        }
        Menu::Confirm => vec![CreateActionRow::Buttons(vec![
            Btn::success(ids::TRANSFER_CONFIRM, "Confirm"),
            Btn::danger(ids::TRANSFER_CANCEL, "Cancel"),
        ])],
    }
}
