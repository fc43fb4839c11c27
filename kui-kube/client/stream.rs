use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use serde::Deserializer as _;
use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};
use std::fmt;
use std::io::{BufReader, Read};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio_util::io::{StreamReader, SyncIoBridge};

use super::ClientError;

#[cfg(test)]
#[path = "./stream.tests.rs"]
mod stream_tests;

const ITEMS_BUFFER_SIZE: usize = 32;
const ITEMS_FIELD: &str = "items";

/// Event produced while a Kubernetes list response is parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    /// Top level fields that precede `items` (`kind`, `apiVersion`, `metadata`).
    Header(Map<String, Value>),

    /// Single element of the `items` array.
    Item(Value),

    /// End of the list together with top level fields that follow `items`.
    Done(Map<String, Value>),
}

/// Stream of [`ListEvent`]s read from the list response body.
pub struct ListEvents {
    events_rx: Receiver<Result<ListEvent, ClientError>>,
}

impl ListEvents {
    /// Returns next parsed event, `None` after [`ListEvent::Done`] or an error.
    pub async fn next(&mut self) -> Option<Result<ListEvent, ClientError>> {
        self.events_rx.recv().await
    }
}

/// Parses the list response `body` incrementally, item after item.\
/// **Note** that parsing happens on a blocking thread and is paused when the consumer does not keep up.
/// It must be called within the tokio runtime.
pub fn parse_list<S, E>(body: S) -> ListEvents
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let (events_tx, events_rx) = mpsc::channel(ITEMS_BUFFER_SIZE);
    let reader = SyncIoBridge::new(StreamReader::new(Box::pin(body).map_err(std::io::Error::other)));

    tokio::task::spawn_blocking(move || {
        if let Err(error) = parse_blocking(reader, &events_tx) {
            let _ = events_tx.blocking_send(Err(error));
        }
    });

    ListEvents { events_rx }
}

fn parse_blocking<R: Read>(reader: R, events_tx: &Sender<Result<ListEvent, ClientError>>) -> Result<(), ClientError> {
    let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(reader));
    let footer = (&mut deserializer).deserialize_map(ListVisitor { events_tx })?;
    deserializer.end()?;

    let _ = events_tx.blocking_send(Ok(ListEvent::Done(footer)));
    Ok(())
}

fn send<E: de::Error>(events_tx: &Sender<Result<ListEvent, ClientError>>, event: ListEvent) -> Result<(), E> {
    events_tx
        .blocking_send(Ok(event))
        .map_err(|_| E::custom("list consumer is gone"))
}

/// Visits top level list object, sends items one by one and returns fields that follow `items`.
struct ListVisitor<'a> {
    events_tx: &'a Sender<Result<ListEvent, ClientError>>,
}

impl<'de> Visitor<'de> for ListVisitor<'_> {
    type Value = Map<String, Value>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a Kubernetes list object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut fields = Map::new();
        while let Some(key) = map.next_key::<String>()? {
            if key == ITEMS_FIELD {
                send::<A::Error>(self.events_tx, ListEvent::Header(std::mem::take(&mut fields)))?;
                map.next_value_seed(ItemsSeed {
                    events_tx: self.events_tx,
                })?;
            } else {
                let value = map.next_value::<Value>()?;
                fields.insert(key, value);
            }
        }

        Ok(fields)
    }
}

/// Sends every element of the `items` array as a separate [`ListEvent::Item`].
struct ItemsSeed<'a> {
    events_tx: &'a Sender<Result<ListEvent, ClientError>>,
}

impl<'de> DeserializeSeed<'de> for ItemsSeed<'_> {
    type Value = ();

    fn deserialize<D: de::Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ItemsSeed<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of Kubernetes objects")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while let Some(item) = seq.next_element::<Value>()? {
            send::<A::Error>(self.events_tx, ListEvent::Item(item))?;
        }

        Ok(())
    }
}
