//! Diesel schema for analytics persistence.

diesel::table! {
    /// Chat session records, one per shopper conversation.
    chat_sessions (id) {
        /// Surrogate row identifier.
        id -> Int8,
        /// Externally supplied unique session identifier.
        #[max_length = 255]
        session_id -> Varchar,
        /// Shopper's user identifier, when known.
        #[max_length = 255]
        user_id -> Nullable<Varchar>,
        /// Session start timestamp.
        start_time -> Timestamptz,
        /// Session end timestamp, set once on close.
        end_time -> Nullable<Timestamptz>,
        /// Originating platform tag.
        #[max_length = 100]
        platform -> Nullable<Varchar>,
        /// Free-form device descriptor.
        device_info -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Append-only interaction records.
    chat_interactions (id) {
        /// Auto-assigned interaction identifier.
        id -> Int8,
        /// Owning session identifier.
        #[max_length = 255]
        session_id -> Varchar,
        /// Recording timestamp.
        timestamp -> Timestamptz,
        /// The shopper's message text.
        user_message -> Text,
        /// The assistant's reply text.
        chatbot_response -> Nullable<Text>,
        /// Detected intent label.
        #[max_length = 100]
        detected_intent -> Nullable<Varchar>,
        /// Classification confidence.
        confidence_score -> Nullable<Float8>,
        /// Whether the message carried an attachment.
        has_attachment -> Bool,
        /// Attachment kind.
        #[max_length = 100]
        attachment_type -> Nullable<Varchar>,
        /// Reply latency in milliseconds.
        response_time_ms -> Nullable<Int8>,
        /// Number of products shown in the reply.
        products_shown -> Int8,
        /// Extracted entity map as JSONB.
        entities -> Nullable<Jsonb>,
        /// Sentiment score.
        sentiment_score -> Nullable<Float8>,
        /// Whether the exchange completed without an internal failure.
        was_successful -> Bool,
        /// Error-kind label for failed exchanges.
        #[max_length = 100]
        error_type -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Cached period rollups, unique per (date, period type).
    analytics_summaries (id) {
        /// Surrogate row identifier.
        id -> Int8,
        /// Period start timestamp (bucket key).
        date -> Timestamptz,
        /// Period type label (bucket kind).
        #[max_length = 50]
        period_type -> Varchar,
        /// Sessions started in the period.
        total_sessions -> Int8,
        /// Interactions recorded in the period.
        total_interactions -> Int8,
        /// Distinct non-null users in the period.
        unique_users -> Int8,
        /// Mean closed-session duration in seconds.
        avg_session_duration_seconds -> Nullable<Float8>,
        /// Mean interaction latency in milliseconds.
        avg_response_time_ms -> Nullable<Float8>,
        /// Sum of products shown.
        products_shown_count -> Int8,
        /// Product-search interaction count.
        product_search_count -> Int8,
        /// Failed interaction count.
        error_count -> Int8,
        /// Intent distribution as JSONB.
        intent_distribution -> Jsonb,
        /// Error-kind distribution as JSONB.
        error_distribution -> Jsonb,
        /// Platform distribution as JSONB.
        platform_distribution -> Jsonb,
    }
}

diesel::allow_tables_to_appear_in_same_query!(chat_sessions, chat_interactions);
