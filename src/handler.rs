//! Serenity event handler: converts Discord events into normalized dispatch
//! events and renders replies back as messages with optional button rows.

use serenity::async_trait;
use serenity::builder::{
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage,
};
use serenity::client::Context;
use serenity::model::application::Interaction;
use serenity::model::{channel::Message, gateway::Ready, id::GuildId};
use serenity::prelude::EventHandler;
use tracing::{info, warn};

use crate::dispatch::{dispatch, Event, Reply};
use crate::model::AppState;
use crate::ui;

pub struct Handler {
    /// When set, guild messages outside this guild are ignored. DMs always
    /// pass.
    pub allowed_guild_id: Option<GuildId>,
}

fn render(reply: &Reply) -> (String, Vec<serenity::builder::CreateActionRow>) {
    let rows = reply
        .menu
        .as_ref()
        .map(ui::menus::action_rows)
        .unwrap_or_default();
    (reply.text.clone(), rows)
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        if let (Some(allowed), Some(guild)) = (self.allowed_guild_id, msg.guild_id) {
            if guild != allowed {
                return;
            }
        }
        let Some(app_state) = AppState::from_ctx(&ctx).await else {
            warn!(target: "handler", "AppState missing from TypeMap");
            return;
        };

        // The chat identity is the Discord user: one payments session per
        // person, regardless of which channel they talk to the bot in.
        let chat_id = msg.author.id.to_string();
        let Some(reply) = dispatch(&app_state, &chat_id, Event::FreeText(msg.content.clone())).await
        else {
            return;
        };
        let (content, rows) = render(&reply);
        let builder = CreateMessage::new().content(content).components(rows);
        if let Err(e) = msg.channel_id.send_message(&ctx.http, builder).await {
            warn!(target: "handler", error = ?e, "failed to deliver reply");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Component(component) = interaction else {
            return;
        };
        let Some(app_state) = AppState::from_ctx(&ctx).await else {
            warn!(target: "handler", "AppState missing from TypeMap");
            return;
        };

        let chat_id = component.user.id.to_string();
        let tag = component.data.custom_id.clone();
        let response = match dispatch(&app_state, &chat_id, Event::Action(tag)).await {
            Some(reply) => {
                let (content, rows) = render(&reply);
                // Edit the menu message in place so stale buttons disappear.
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .content(content)
                        .components(rows),
                )
            }
            // Mismatch policy chose to drop the event; still ack so the
            // client doesn't show "interaction failed".
            None => CreateInteractionResponse::Acknowledge,
        };
        if let Err(e) = component.create_response(&ctx.http, response).await {
            warn!(target: "handler", error = ?e, "failed to respond to component");
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(target: "handler", user = %ready.user.name, "connected and ready");
    }
}
