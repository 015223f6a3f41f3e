diesel::table! {
    ticket_configs (guild_id) {
        guild_id -> Text,
        create_channel_id -> Text,
        parent_channel_id -> Text,
        transcripts_channel_id -> Text,
        creation_method -> Text,
        embed_title -> Nullable<Text>,
        embed_description -> Nullable<Text>,
        enabled -> Bool,
    }
}

diesel::table! {
    tickets (channel_id) {
        guild_id -> Text,
        channel_id -> Text,
        ticket_id -> Text,
        creator_id -> Text,
        closed -> Bool,
    }
}

diesel::allow_tables_to_appear_in_same_query!(ticket_configs, tickets);
