//! # Matching Flows
//!
//! Interests, exclusion filters and Bloom filters working together across
//! shared-types, ccn-01-bloom-filters and ccn-02-interest-matching.
//!
//! ## Flows Tested:
//!
//! 1. **Responder side**: an Interest with explicit and Bloom exclusions
//!    decides which of several stored objects may be served
//! 2. **Digest-exact retrieval**: the implicit digest component names one
//!    exact object
//! 3. **Filters on the wire**: exclusion filters survive bincode encoding and
//!    reject tampered element order on decode

#[cfg(test)]
mod tests {
    use ccn_01_bloom_filters::BloomFilter;
    use ccn_02_interest_matching::{
        ChildSelector, ExcludeElement, ExcludeError, ExcludeFilter, Interest, PublisherConstraint,
    };
    use shared_types::{ContentObject, Name, NameComponent, PublisherId, PublisherPublicKeyDigest};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const NUMBERS: [&str; 13] = [
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
        "twelve", "thirteen",
    ];

    fn name(uri: &str) -> Name {
        Name::from_uri(uri).unwrap()
    }

    /// Bloom filter holding the words one..thirteen, seeded "burp"
    fn numbers_bloom() -> BloomFilter {
        let mut bloom = BloomFilter::new(NUMBERS.len(), *b"burp");
        for word in NUMBERS {
            bloom.insert(word.as_bytes());
        }
        bloom
    }

    /// `aaa`, Bloom{one..thirteen}, `zzzzzzzz`
    fn paul_exclusions() -> ExcludeFilter {
        ExcludeFilter::new(vec![
            ExcludeElement::Component(NameComponent::from("aaa")),
            ExcludeElement::Bloom(numbers_bloom()),
            ExcludeElement::Component(NameComponent::from("zzzzzzzz")),
        ])
        .expect("strictly increasing elements")
    }

    fn stored(uri: &str, body: &str) -> ContentObject {
        ContentObject::builder(name(uri))
            .content(body)
            .publisher(PublisherPublicKeyDigest([7u8; 32]))
            .build()
    }

    // =============================================================================
    // INTEGRATION TESTS: RESPONDER SELECTION
    // =============================================================================

    /// The canonical exclusion scenario on `/paul`
    #[test]
    fn test_paul_exclusion_scenario() {
        let interest = Interest::new(name("/paul")).with_exclude(paul_exclusions());

        assert!(interest.matches(&name("/paul/car"), None), "car is not excluded");
        assert!(!interest.matches(&name("/paul/zzzzzzzz"), None));
        assert!(!interest.matches(&name("/paul/aaa"), None));
        for word in NUMBERS {
            let candidate = name("/paul").append(word);
            assert!(
                !interest.matches(&candidate, None),
                "/paul/{} should be excluded by the Bloom element",
                word
            );
        }
    }

    /// A responder picks the best stored object the Interest still accepts
    #[test]
    fn test_responder_skips_excluded_children() {
        let store = vec![
            stored("/paul/one/v1", "excluded by bloom"),
            stored("/paul/car/v1", "car"),
            stored("/paul/zzzzzzzz/v1", "excluded explicitly"),
            stored("/paul/house/v1", "house"),
        ];

        let left = Interest::new(name("/paul")).with_exclude(paul_exclusions());
        assert_eq!(left.select_best(&store).unwrap().name(), &name("/paul/car/v1"));

        let right = left.clone().with_child_selector(ChildSelector::Right);
        assert_eq!(right.select_best(&store).unwrap().name(), &name("/paul/house/v1"));
    }

    /// Excluding what was already received walks a responder through every child
    #[test]
    fn test_exclusion_driven_enumeration() {
        let store = vec![
            stored("/dir/a", "a"),
            stored("/dir/b", "b"),
            stored("/dir/c", "c"),
        ];

        let mut seen: Vec<NameComponent> = Vec::new();
        loop {
            let interest = Interest::new(name("/dir"))
                .with_exclude(ExcludeFilter::from_components(seen.clone()));
            let Some(best) = interest.select_best(&store) else {
                break;
            };
            seen.push(best.name().component(1).unwrap().clone());
        }

        let seen: Vec<String> = seen.iter().map(|c| c.to_string()).collect();
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    // =============================================================================
    // INTEGRATION TESTS: DIGEST AND PUBLISHER
    // =============================================================================

    #[test]
    fn test_digest_exact_retrieval() {
        let object = stored("/paul", "exact bytes");
        let other = stored("/paul", "different bytes");

        let exact = Interest::new(object.full_name());
        assert!(exact.matches_object(&object));
        assert!(!exact.matches_object(&other));

        let wrong_digest = Interest::new(name("/paul").append(other.digest_component()));
        assert!(!wrong_digest.matches_object(&object));
    }

    #[test]
    fn test_publisher_constrained_selection() {
        let trusted = stored("/news/today", "trusted");
        let rogue = ContentObject::builder(name("/news/today"))
            .content("rogue")
            .publisher(PublisherPublicKeyDigest([9u8; 32]))
            .build();

        let interest = Interest::new(name("/news")).with_publisher(PublisherConstraint::Publisher(
            PublisherId::from_key(PublisherPublicKeyDigest([7u8; 32])),
        ));
        let candidates = vec![rogue.clone(), trusted.clone()];

        assert_eq!(interest.select_best(&candidates).unwrap().content(), b"trusted");
        assert!(!interest.matches_object(&rogue));
    }

    // =============================================================================
    // INTEGRATION TESTS: FILTERS ON THE WIRE
    // =============================================================================

    #[test]
    fn test_exclude_filter_survives_bincode() {
        let filter = paul_exclusions();
        let bytes = bincode::serialize(&filter).unwrap();
        let decoded: ExcludeFilter = bincode::deserialize(&bytes).unwrap();

        assert_eq!(decoded, filter);
        assert!(decoded.matches(&NameComponent::from("seven")));
        assert!(!decoded.matches(&NameComponent::from("car")));
    }

    #[test]
    fn test_tampered_order_rejected_on_decode() {
        let reversed = vec![
            ExcludeElement::Component(NameComponent::from("zzzzzzzz")),
            ExcludeElement::Component(NameComponent::from("aaa")),
        ];
        assert_eq!(
            ExcludeFilter::new(reversed.clone()),
            Err(ExcludeError::InvalidOrdering { index: 1 })
        );

        let bytes = bincode::serialize(&reversed).unwrap();
        assert!(bincode::deserialize::<ExcludeFilter>(&bytes).is_err());
    }

    #[test]
    fn test_bloom_bytes_are_deterministic() {
        assert_eq!(numbers_bloom().to_bytes(), numbers_bloom().to_bytes());
        let decoded = BloomFilter::from_bytes(&numbers_bloom().to_bytes()).unwrap();
        for word in NUMBERS {
            assert!(decoded.test(word.as_bytes()));
        }
    }
}
