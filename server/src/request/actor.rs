use axum::http::{HeaderName, HeaderValue};
use axum_extra::headers::{Error, Header};
use uuid::Uuid;

static X_ACTOR_ID: HeaderName = HeaderName::from_static("x-actor-id");

/// Caller identity, resolved upstream and forwarded in `x-actor-id`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ActorId(pub Uuid);

impl Header for ActorId {
    fn name() -> &'static HeaderName {
        &X_ACTOR_ID
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(Error::invalid)?;
        let value = value.to_str().map_err(|_| Error::invalid())?;
        Uuid::parse_str(value.trim())
            .map(ActorId)
            .map_err(|_| Error::invalid())
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        if let Ok(value) = HeaderValue::from_str(&self.0.to_string()) {
            values.extend(std::iter::once(value));
        }
    }
}

#[cfg(test)]
mod test {
    use axum::http::HeaderValue;
    use axum_extra::headers::Header;
    use uuid::Uuid;

    use super::ActorId;

    #[test]
    fn decodes_uuid_header() {
        let id = Uuid::new_v4();
        let value = HeaderValue::from_str(&id.to_string()).unwrap();
        let decoded = ActorId::decode(&mut std::iter::once(&value)).unwrap();
        assert_eq!(decoded, ActorId(id));
    }

    #[test]
    fn rejects_garbage() {
        let value = HeaderValue::from_static("not-a-user");
        assert!(ActorId::decode(&mut std::iter::once(&value)).is_err());
        assert!(ActorId::decode(&mut std::iter::empty()).is_err());
    }
}
