//! Chat orchestration: classify, dispatch, reply, record.

use crate::analytics::{
    domain::{EntityMap, Intent, PRODUCT_ENTITY_KEY},
    ports::EventStore,
    services::{EventRecorder, RecordInteractionRequest},
};
use crate::assistant::{
    domain::{ChatReply, ConversationContext, ImageAnalysis, IntentClassification},
    ports::LanguageModel,
};
use crate::catalog::{
    domain::{Order, OrderId, Product},
    ports::Catalog,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::warn;

/// Interactions loaded into the conversation context.
const CONTEXT_LIMIT: usize = 20;
/// Products returned by a search reply.
const SEARCH_LIMIT: usize = 5;
/// Products returned by a recommendation reply.
const RECOMMENDATION_LIMIT: usize = 3;

const GREETINGS: [&str; 4] = [
    "Hello! How can I help with your shopping today?",
    "Hi there! Looking for something specific in our store?",
    "Welcome! I'm your shopping assistant. What can I help you find today?",
    "Greetings! I'm here to help you find the perfect product. What are you looking for?",
];

const GENERAL_FALLBACK: &str = "I'm here to help with your shopping needs. \
    Could you please provide more details about what you're looking for?";
const PROCESSING_ERROR_REPLY: &str =
    "I'm sorry, I encountered an error while processing your message. Please try again.";
const IMAGE_ERROR_REPLY: &str = "I'm sorry, I encountered an error analyzing this image. \
    Please try again or describe the product you're looking for.";
const UNREADABLE_IMAGE_REPLY: &str = "I couldn't analyze this image properly. \
    Could you please try a clearer image or describe what you're looking for?";

/// What one dispatched handler produced, plus the telemetry that goes with
/// the reply.
struct Dispatch {
    reply: ChatReply,
    products_shown: u64,
    error_kind: Option<&'static str>,
    entities: Option<EntityMap>,
}

impl Dispatch {
    fn reply(reply: ChatReply) -> Self {
        Self {
            reply,
            products_shown: 0,
            error_kind: None,
            entities: None,
        }
    }

    fn text(message: impl Into<String>) -> Self {
        Self::reply(ChatReply::text(message))
    }

    fn showing(reply: ChatReply, products_shown: u64) -> Self {
        Self {
            reply,
            products_shown,
            error_kind: None,
            entities: None,
        }
    }
}

/// Orchestrates one shopper exchange end to end.
///
/// Every public operation resolves to a well-formed [`ChatReply`]; internal
/// failures degrade to apologetic fallback text and the exchange is still
/// recorded as telemetry. A failed telemetry write is logged and swallowed
/// so the shopper always gets their reply.
#[derive(Clone)]
pub struct ChatService<L, K, E, C>
where
    L: LanguageModel,
    K: Catalog,
    E: EventStore,
    C: Clock + Send + Sync,
{
    language_model: Arc<L>,
    catalog: Arc<K>,
    recorder: EventRecorder<E, C>,
    clock: Arc<C>,
}

impl<L, K, E, C> ChatService<L, K, E, C>
where
    L: LanguageModel,
    K: Catalog,
    E: EventStore,
    C: Clock + Send + Sync,
{
    /// Creates a new chat service over the given collaborators.
    #[must_use]
    pub fn new(language_model: Arc<L>, catalog: Arc<K>, events: Arc<E>, clock: Arc<C>) -> Self {
        let recorder = EventRecorder::new(Arc::clone(&events), Arc::clone(&clock));
        Self {
            language_model,
            catalog,
            recorder,
            clock,
        }
    }

    /// Processes one text message and returns the assistant's reply.
    pub async fn process_message(&self, session_id: &str, message: &str) -> ChatReply {
        let started = self.clock.utc();
        let context = self.load_context(session_id).await;

        let classification = match self.language_model.classify_intent(message).await {
            Ok(classification) => classification,
            Err(err) => {
                warn!(error = %err, "intent classification failed, falling back");
                IntentClassification::fallback()
            }
        };

        let dispatch = self.dispatch(message, &classification, &context).await;
        self.record_text_exchange(session_id, message, &classification, &dispatch, started)
            .await;
        dispatch.reply
    }

    /// Processes one message with an attached image and returns the
    /// assistant's reply.
    pub async fn process_image_message(
        &self,
        session_id: &str,
        message: &str,
        image: &[u8],
    ) -> ChatReply {
        let started = self.clock.utc();

        let dispatch = match self.language_model.analyze_image(image).await {
            Ok(Some(analysis)) => self.handle_image_analysis(&analysis).await,
            Ok(None) => Dispatch::text(UNREADABLE_IMAGE_REPLY),
            Err(err) => {
                warn!(error = %err, "image analysis failed");
                Dispatch {
                    reply: ChatReply::degraded(IMAGE_ERROR_REPLY, "image analysis failed"),
                    products_shown: 0,
                    error_kind: Some("language_model"),
                    entities: None,
                }
            }
        };

        self.record_image_exchange(session_id, message, &dispatch, started)
            .await;
        dispatch.reply
    }

    async fn load_context(&self, session_id: &str) -> ConversationContext {
        match self
            .recorder
            .recent_interactions(session_id, CONTEXT_LIMIT)
            .await
        {
            Ok(history) => ConversationContext::from_interactions(&history),
            Err(err) => {
                warn!(session_id, error = %err, "could not load conversation history");
                ConversationContext::empty()
            }
        }
    }

    async fn dispatch(
        &self,
        message: &str,
        classification: &IntentClassification,
        context: &ConversationContext,
    ) -> Dispatch {
        match classification.intent {
            Intent::ProductSearch => self.handle_product_search(classification).await,
            Intent::ProductInfo => self.handle_product_info(classification).await,
            Intent::OrderStatus => self.handle_order_status(classification).await,
            Intent::Recommendations => self.handle_recommendations(classification).await,
            Intent::Greeting => self.handle_greeting(),
            Intent::GeneralQuestion
            | Intent::Support
            | Intent::PriceInquiry
            | Intent::Comparison
            | Intent::CheckoutHelp => self.handle_general(message, context).await,
        }
    }

    async fn handle_product_search(&self, classification: &IntentClassification) -> Dispatch {
        if let Some(product) = classification.product() {
            match self.catalog.find_products(product, SEARCH_LIMIT).await {
                Ok(products) if products.is_empty() => Dispatch::text(format!(
                    "I couldn't find any products matching '{product}'. \
                     Would you like to see some recommendations instead?"
                )),
                Ok(products) => product_list_dispatch(
                    format!("I found the following products matching '{product}':"),
                    &products,
                ),
                Err(err) => catalog_failure(&err),
            }
        } else if let Some(category) = classification.category() {
            match self.catalog.find_products(category, SEARCH_LIMIT).await {
                Ok(products) if products.is_empty() => Dispatch::text(format!(
                    "I couldn't find any products in the '{category}' category. \
                     Would you like to see our popular products instead?"
                )),
                Ok(products) => product_list_dispatch(
                    format!("Here are some products in the '{category}' category:"),
                    &products,
                ),
                Err(err) => catalog_failure(&err),
            }
        } else {
            Dispatch::text(
                "What kind of product are you looking for? \
                 You can specify a product name or category.",
            )
        }
    }

    async fn handle_product_info(&self, classification: &IntentClassification) -> Dispatch {
        let Some(product_name) = classification.product() else {
            return Dispatch::text("Which product would you like information about?");
        };

        match self.catalog.find_products(product_name, 1).await {
            Ok(products) => match products.first() {
                Some(product) => {
                    let message = format!(
                        "Here's information about {}:\n{}\nPrice: {}\nCategory: {}",
                        product.name,
                        product.description,
                        product.display_price(),
                        product.category
                    );
                    Dispatch::showing(
                        ChatReply::with_data(message, json!({ "product": display_product(product) })),
                        1,
                    )
                }
                None => Dispatch::text(format!(
                    "I couldn't find any information about '{product_name}'. \
                     Can you try with a different product name?"
                )),
            },
            Err(err) => catalog_failure(&err),
        }
    }

    async fn handle_order_status(&self, classification: &IntentClassification) -> Dispatch {
        let Some(order_id) = classification.order_id() else {
            return Dispatch::text("Could you provide your order number so I can check its status?");
        };

        let lookup = self.catalog.get_order(&OrderId::new(order_id)).await;
        match lookup {
            Ok(Some(order)) => Dispatch::reply(order_status_reply(&order)),
            Ok(None) => Dispatch::text(format!(
                "I couldn't find order #{order_id}. Please check the order number and try again."
            )),
            Err(err) => catalog_failure(&err),
        }
    }

    async fn handle_recommendations(&self, classification: &IntentClassification) -> Dispatch {
        let (lookup, message) = if let Some(category) = classification.category() {
            (
                self.catalog
                    .find_products(category, RECOMMENDATION_LIMIT)
                    .await,
                format!("Based on your interest in {category}, here are some recommendations:"),
            )
        } else if let Some(product) = classification.product() {
            (
                self.catalog
                    .find_products(product, RECOMMENDATION_LIMIT)
                    .await,
                format!("If you like {product}, you might also like these products:"),
            )
        } else {
            (
                self.catalog.trending_products(RECOMMENDATION_LIMIT).await,
                "Here are some popular products you might be interested in:".to_owned(),
            )
        };

        match lookup {
            Ok(products) if products.is_empty() => Dispatch::text(
                "I don't have any recommendations at the moment. \
                 Is there a specific category you're interested in?",
            ),
            Ok(products) => product_list_dispatch(message, &products),
            Err(err) => catalog_failure(&err),
        }
    }

    fn handle_greeting(&self) -> Dispatch {
        // Rotation keyed off the clock's sub-second component; deterministic
        // under a frozen test clock.
        let index = self.clock.utc().timestamp_subsec_millis() as usize % GREETINGS.len();
        let greeting = GREETINGS.get(index).copied().unwrap_or(GENERAL_FALLBACK);
        Dispatch::text(greeting)
    }

    async fn handle_general(&self, message: &str, context: &ConversationContext) -> Dispatch {
        match self.language_model.generate_reply(message, context).await {
            Ok(reply) => Dispatch::text(reply),
            Err(err) => {
                warn!(error = %err, "reply generation failed, using fallback");
                Dispatch {
                    reply: ChatReply::text(GENERAL_FALLBACK),
                    products_shown: 0,
                    error_kind: Some("language_model"),
                    entities: None,
                }
            }
        }
    }

    async fn handle_image_analysis(&self, analysis: &ImageAnalysis) -> Dispatch {
        let similar = match self.similar_products(analysis).await {
            Ok(products) => products,
            Err(err) => {
                // The analysis is still worth replying with; drop the
                // similar-products section only.
                warn!(error = %err, "similar-product lookup failed");
                Vec::new()
            }
        };

        let message = compose_analysis_message(analysis, !similar.is_empty());
        let data = if similar.is_empty() {
            json!({ "analyzed_product": analysis })
        } else {
            json!({
                "products": similar.iter().map(display_product).collect::<Vec<_>>(),
                "analyzed_product": analysis,
            })
        };

        let mut entities = EntityMap::new();
        entities.insert(
            PRODUCT_ENTITY_KEY.to_owned(),
            Value::String(analysis.product_name.clone()),
        );

        Dispatch {
            reply: ChatReply::with_data(message, data),
            products_shown: similar.len() as u64,
            error_kind: None,
            entities: Some(entities),
        }
    }

    async fn similar_products(
        &self,
        analysis: &ImageAnalysis,
    ) -> crate::catalog::ports::CatalogResult<Vec<Product>> {
        let name = analysis.product_name.trim();
        let category = analysis.category.trim();

        if !name.is_empty() {
            let products = self.catalog.find_products(name, RECOMMENDATION_LIMIT).await?;
            if !products.is_empty() {
                return Ok(products);
            }
        }
        if !category.is_empty() {
            let products = self
                .catalog
                .find_products(category, RECOMMENDATION_LIMIT)
                .await?;
            if !products.is_empty() {
                return Ok(products);
            }
        }
        self.catalog.trending_products(RECOMMENDATION_LIMIT).await
    }

    async fn record_text_exchange(
        &self,
        session_id: &str,
        message: &str,
        classification: &IntentClassification,
        dispatch: &Dispatch,
        started: DateTime<Utc>,
    ) {
        let latency_ms = (self.clock.utc() - started).num_milliseconds();
        let mut request = RecordInteractionRequest::new(session_id, message)
            .with_response(dispatch.reply.message.clone())
            .with_intent(classification.intent, classification.confidence)
            .with_response_time_ms(latency_ms)
            .with_products_shown(dispatch.products_shown);
        if !classification.entities.is_empty() {
            request = request.with_entities(classification.entities.clone());
        }
        if let Some(kind) = dispatch.error_kind {
            request = request.failed(kind);
        }
        if let Err(err) = self.recorder.record_interaction(request).await {
            warn!(session_id, error = %err, "failed to record chat interaction");
        }
    }

    async fn record_image_exchange(
        &self,
        session_id: &str,
        message: &str,
        dispatch: &Dispatch,
        started: DateTime<Utc>,
    ) {
        let latency_ms = (self.clock.utc() - started).num_milliseconds();
        let mut request = RecordInteractionRequest::new(session_id, message)
            .with_response(dispatch.reply.message.clone())
            .with_attachment("image")
            .with_response_time_ms(latency_ms)
            .with_products_shown(dispatch.products_shown);
        if let Some(entities) = dispatch.entities.clone() {
            request = request.with_entities(entities);
        }
        if let Some(kind) = dispatch.error_kind {
            request = request.failed(kind);
        }
        if let Err(err) = self.recorder.record_interaction(request).await {
            warn!(session_id, error = %err, "failed to record image interaction");
        }
    }
}

fn catalog_failure(err: &crate::catalog::ports::CatalogError) -> Dispatch {
    warn!(error = %err, "catalog lookup failed");
    Dispatch {
        reply: ChatReply::degraded(PROCESSING_ERROR_REPLY, "catalog lookup failed"),
        products_shown: 0,
        error_kind: Some("catalog"),
        entities: None,
    }
}

fn display_product(product: &Product) -> Value {
    json!({
        "id": product.product_id.as_str(),
        "name": product.name,
        "description": product.description,
        "price": product.display_price(),
        "category": product.category,
        "image_url": product.image_url,
        "in_stock": if product.in_stock { "In Stock" } else { "Out of Stock" },
    })
}

fn product_list_dispatch(message: String, products: &[Product]) -> Dispatch {
    let displayed: Vec<Value> = products.iter().map(display_product).collect();
    Dispatch::showing(
        ChatReply::with_data(message, json!({ "products": displayed })),
        products.len() as u64,
    )
}

fn order_status_reply(order: &Order) -> ChatReply {
    let message = format!(
        "Your order #{} is currently {}. It contains {} item(s) with a total of ${:.2}.",
        order.order_id,
        order.status,
        order.item_count(),
        order.total_amount
    );
    match serde_json::to_value(order) {
        Ok(payload) => ChatReply::with_data(message, json!({ "order": payload })),
        Err(_) => ChatReply::text(message),
    }
}

fn compose_analysis_message(analysis: &ImageAnalysis, has_similar: bool) -> String {
    let mut text = format!(
        "## Product Analysis: {}\n\n**Category:** {}\n**Price Range:** {}\n\n{}\n\n**Key Features:**",
        analysis.product_name, analysis.category, analysis.price_range, analysis.description
    );
    for feature in &analysis.features {
        text.push_str("\n\u{2022} ");
        text.push_str(feature);
    }
    if !analysis.recommended_uses.is_empty() {
        text.push_str("\n\nRecommended uses:");
        for use_case in &analysis.recommended_uses {
            text.push_str("\n\u{2022} ");
            text.push_str(use_case);
        }
    }
    text.push_str("\n\n");
    text.push_str(if has_similar {
        "I found some similar products in our catalog that might interest you:"
    } else {
        "I don't have any similar products in our catalog at the moment. \
         Would you like me to help you find something else?"
    });
    text
}
