use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, PaymentCompletedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub payment_completed_producer: Vec<EventProducer<PaymentCompletedEvent>>,
}

pub struct EventHandlers {
    pub on_payment_completed: Option<EventHandler<PaymentCompletedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_payment_completed = hooks.on_payment_completed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_payment_completed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_payment_completed {
            result.payment_completed_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_payment_completed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_payment_completed: Option<Handler<PaymentCompletedEvent>>,
}

impl EventHooks {
    pub fn on_payment_completed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(PaymentCompletedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_payment_completed = Some(Arc::new(f));
        self
    }
}
