use super::afk::{can_edit_nickname, is_afk, strip_afk};
use super::snipe::{DeletedMessage, SnipeBuffer};
use crate::events::EventHandler;
use async_trait::async_trait;
use chrono::Utc;
use poise::serenity_prelude::{Context, EditMember, FullEvent, Mentionable};
use std::sync::Arc;
use tracing::debug;

/// Feeds deleted guild messages into the snipe buffer.
#[derive(Debug, Clone)]
pub struct SnipeHandler {
    snipes: Arc<SnipeBuffer>,
}

impl SnipeHandler {
    pub fn new(snipes: Arc<SnipeBuffer>) -> Self {
        Self { snipes }
    }
}

#[async_trait]
impl EventHandler for SnipeHandler {
    fn name(&self) -> &str {
        "Snipe"
    }

    async fn handle(
        &self,
        ctx: &Context,
        event: &FullEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let FullEvent::MessageDelete {
            channel_id,
            deleted_message_id,
            guild_id,
        } = event
        else {
            return Ok(());
        };

        if guild_id.is_none() {
            return Ok(());
        }

        let record = ctx
            .cache
            .message(*channel_id, *deleted_message_id)
            .map(|message| DeletedMessage {
                author_id: message.author.id,
                author_display: message.author.tag(),
                content: message.content.clone(),
                deleted_at: Utc::now().timestamp(),
            });

        match record {
            Some(record) => self.snipes.record_deletion(*channel_id, record),
            None => debug!(
                "Message {} deleted in {} was not cached",
                deleted_message_id, channel_id
            ),
        }
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn EventHandler> {
        Box::new(self.clone())
    }
}

/// Clears the AFK prefix from members as soon as they talk again.
#[derive(Debug, Clone)]
pub struct AfkHandler;

#[async_trait]
impl EventHandler for AfkHandler {
    fn name(&self) -> &str {
        "Afk"
    }

    async fn handle(
        &self,
        ctx: &Context,
        event: &FullEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let FullEvent::Message { new_message } = event else {
            return Ok(());
        };

        if new_message.author.bot {
            return Ok(());
        }
        let Some(guild_id) = new_message.guild_id else {
            return Ok(());
        };
        let Some(member) = new_message.member.as_deref() else {
            return Ok(());
        };
        let Some(nickname) = member.nick.as_deref() else {
            return Ok(());
        };
        if !is_afk(nickname) {
            return Ok(());
        }

        let bot_id = ctx.cache.current_user().id;
        let can_edit = match ctx.cache.guild(guild_id) {
            Some(guild) => guild.members.get(&bot_id).is_some_and(|bot| {
                can_edit_nickname(
                    &guild.roles,
                    guild.owner_id,
                    &bot.roles,
                    new_message.author.id,
                    &member.roles,
                )
            }),
            None => false,
        };
        if !can_edit {
            debug!(
                "Leaving AFK nickname of {} alone, they outrank the bot",
                new_message.author.id
            );
            return Ok(());
        }

        let restored = strip_afk(nickname);
        guild_id
            .edit_member(
                ctx,
                new_message.author.id,
                EditMember::new().nickname(restored),
            )
            .await?;

        new_message
            .channel_id
            .say(
                &ctx.http,
                format!(
                    "Welcome back {}! I've unset your AFK status.",
                    new_message.author.mention()
                ),
            )
            .await?;
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn EventHandler> {
        Box::new(self.clone())
    }
}
