use casque::aggregate;
use casque::attributes::Attributes;
use casque::priority::SeoMatchTable;
use casque::props::HeadProps;

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
	pairs.iter().cloned().collect()
}

fn entry(id: &str, props: HeadProps) -> (String, HeadProps) {
	(id.to_owned(), props)
}

fn merged(registry: Vec<(String, HeadProps)>) -> casque::AggregatedState {
	aggregate(&registry, &SeoMatchTable::default())
}

#[test]
fn single_fragment_is_verbatim() {
	let state = merged(vec![entry(
		"only",
		HeadProps {
			title: Some("Lone".to_owned()),
			defer: Some(true),
			html_attributes: Some(attrs(&[("lang", "en")])),
			meta: vec![attrs(&[("name", "description"), ("content", "one")])],
			..HeadProps::default()
		},
	)]);

	assert_eq!(state.title.as_deref(), Some("Lone"));
	assert_eq!(state.defer, Some(true));
	assert_eq!(state.html_attributes, attrs(&[("lang", "en")]));
	assert_eq!(state.meta, vec![attrs(&[("name", "description"), ("content", "one")])]);
	// Defaulted even when never declared.
	assert!(state.encode_special_characters);
	assert!(state.priority.is_none());
}

#[test]
fn empty_registry_is_baseline() {
	let state = merged(vec![]);
	assert_eq!(state.title, None);
	assert_eq!(state.base, None);
	assert!(state.meta.is_empty());
	assert!(state.html_attributes.is_empty());
	assert!(state.encode_special_characters);
}

#[test]
fn innermost_scalar_wins() {
	let state = merged(vec![
		entry("outer", HeadProps { title: Some("A".to_owned()), ..HeadProps::default() }),
		entry("inner", HeadProps { title: Some("B".to_owned()), ..HeadProps::default() }),
	]);
	assert_eq!(state.title.as_deref(), Some("B"));
}

#[test]
fn scalar_from_outer_survives_when_inner_is_silent() {
	let state = merged(vec![
		entry("outer", HeadProps { defer: Some(true), ..HeadProps::default() }),
		entry("inner", HeadProps::default()),
	]);
	assert_eq!(state.defer, Some(true));
}

#[test]
fn object_merge_overwrites_per_key() {
	let state = merged(vec![
		entry("outer", HeadProps { body_attributes: Some(attrs(&[("class", "x"), ("id", "a")])), ..HeadProps::default() }),
		entry("inner", HeadProps { body_attributes: Some(attrs(&[("class", "y")])), ..HeadProps::default() }),
	]);
	assert_eq!(state.body_attributes, attrs(&[("class", "y"), ("id", "a")]));
}

#[test]
fn title_template_substitutes_every_placeholder() {
	let state = merged(vec![entry(
		"page",
		HeadProps {
			title: Some("Home".to_owned()),
			title_template: Some("%s | Site (%s)".to_owned()),
			..HeadProps::default()
		},
	)]);
	assert_eq!(state.title.as_deref(), Some("Home | Site (Home)"));
}

#[test]
fn empty_title_ignores_template_and_falls_back() {
	let state = merged(vec![entry(
		"page",
		HeadProps {
			title: Some(String::new()),
			title_template: Some("%s | Site".to_owned()),
			default_title: Some("Fallback".to_owned()),
			..HeadProps::default()
		},
	)]);
	assert_eq!(state.title.as_deref(), Some("Fallback"));
}

#[test]
fn missing_title_and_default_resolves_to_none() {
	let state = merged(vec![entry(
		"page",
		HeadProps {
			title_template: Some("%s | Site".to_owned()),
			..HeadProps::default()
		},
	)]);
	assert_eq!(state.title, None);
}

#[test]
fn template_from_outer_applies_to_inner_title() {
	let state = merged(vec![
		entry("layout", HeadProps { title_template: Some("%s | Site".to_owned()), ..HeadProps::default() }),
		entry("page", HeadProps { title: Some("Home".to_owned()), ..HeadProps::default() }),
	]);
	assert_eq!(state.title.as_deref(), Some("Home | Site"));
}

#[test]
fn base_requires_href_or_target() {
	let state = merged(vec![
		entry("outer", HeadProps { base: Some(attrs(&[("href", "/app/")])), ..HeadProps::default() }),
		entry("inner", HeadProps { base: Some(attrs(&[("id", "nameless")])), ..HeadProps::default() }),
	]);
	// The inner base has neither href nor target and is ignored.
	assert_eq!(state.base, Some(attrs(&[("href", "/app/")])));
}

#[test]
fn innermost_usable_base_wins() {
	let state = merged(vec![
		entry("outer", HeadProps { base: Some(attrs(&[("href", "/a/")])), ..HeadProps::default() }),
		entry("inner", HeadProps { base: Some(attrs(&[("target", "_blank")])), ..HeadProps::default() }),
	]);
	assert_eq!(state.base, Some(attrs(&[("target", "_blank")])));
}

#[test]
fn outer_instance_wins_dedup() {
	let state = merged(vec![
		entry("outer", HeadProps { meta: vec![attrs(&[("name", "a"), ("content", "1")])], ..HeadProps::default() }),
		entry("inner", HeadProps { meta: vec![attrs(&[("name", "a"), ("content", "2")])], ..HeadProps::default() }),
	]);
	assert_eq!(state.meta, vec![attrs(&[("name", "a"), ("content", "1")])]);
}

#[test]
fn description_survives_from_outer_instance() {
	let state = merged(vec![
		entry("outer", HeadProps { meta: vec![attrs(&[("name", "description"), ("content", "outer copy")])], ..HeadProps::default() }),
		entry("inner", HeadProps { meta: vec![attrs(&[("name", "description"), ("content", "inner copy")])], ..HeadProps::default() }),
	]);
	assert_eq!(state.meta, vec![attrs(&[("name", "description"), ("content", "outer copy")])]);
}

#[test]
fn later_entry_of_same_instance_wins_in_place() {
	let state = merged(vec![entry(
		"only",
		HeadProps {
			meta: vec![
				attrs(&[("name", "a"), ("content", "first")]),
				attrs(&[("name", "b"), ("content", "other")]),
				attrs(&[("name", "a"), ("content", "second")]),
			],
			..HeadProps::default()
		},
	)]);
	assert_eq!(
		state.meta,
		vec![
			attrs(&[("name", "a"), ("content", "second")]),
			attrs(&[("name", "b"), ("content", "other")]),
		]
	);
}

#[test]
fn primary_values_compare_case_insensitively() {
	let state = merged(vec![
		entry("outer", HeadProps { meta: vec![attrs(&[("name", "Author"), ("content", "x")])], ..HeadProps::default() }),
		entry("inner", HeadProps { meta: vec![attrs(&[("name", "author"), ("content", "y")])], ..HeadProps::default() }),
	]);
	assert_eq!(state.meta.len(), 1);
	assert_eq!(state.meta[0].get("content"), Some("x"));
}

#[test]
fn distinct_primary_values_coexist_in_order() {
	let state = merged(vec![
		entry("outer", HeadProps { meta: vec![attrs(&[("name", "a"), ("content", "1")])], ..HeadProps::default() }),
		entry(
			"inner",
			HeadProps {
				meta: vec![attrs(&[("name", "b"), ("content", "2")]), attrs(&[("charSet", "utf-8")])],
				..HeadProps::default()
			},
		),
	]);
	assert_eq!(
		state.meta,
		vec![
			attrs(&[("name", "a"), ("content", "1")]),
			attrs(&[("name", "b"), ("content", "2")]),
			attrs(&[("charSet", "utf-8")]),
		]
	);
}

#[test]
fn canonical_links_collapse_to_one() {
	let state = merged(vec![
		entry("outer", HeadProps { link: vec![attrs(&[("rel", "canonical"), ("href", "https://a.example/")])], ..HeadProps::default() }),
		entry("inner", HeadProps { link: vec![attrs(&[("rel", "canonical"), ("href", "https://b.example/")])], ..HeadProps::default() }),
	]);
	assert_eq!(state.link.len(), 1);
	assert_eq!(state.link[0].get("href"), Some("https://a.example/"));
}

#[test]
fn stylesheets_dedupe_by_href() {
	let state = merged(vec![
		entry(
			"outer",
			HeadProps {
				link: vec![
					attrs(&[("rel", "stylesheet"), ("href", "/a.css")]),
					attrs(&[("rel", "stylesheet"), ("href", "/b.css")]),
				],
				..HeadProps::default()
			},
		),
		entry("inner", HeadProps { link: vec![attrs(&[("rel", "stylesheet"), ("href", "/a.css")])], ..HeadProps::default() }),
	]);
	assert_eq!(state.link.len(), 2);
	assert_eq!(state.link[0].get("href"), Some("/a.css"));
	assert_eq!(state.link[1].get("href"), Some("/b.css"));
}

#[test]
fn inline_script_dedupes_by_content() {
	let body = "window.__x = 1;";
	let state = merged(vec![
		entry("outer", HeadProps { script: vec![attrs(&[("src", "/a.js"), ("innerHTML", body)])], ..HeadProps::default() }),
		entry("inner", HeadProps { script: vec![attrs(&[("src", "/b.js"), ("innerHTML", body)])], ..HeadProps::default() }),
	]);
	// innerHTML forces itself as the primary attribute, so both tags share a key.
	assert_eq!(state.script.len(), 1);
	assert_eq!(state.script[0].get("src"), Some("/a.js"));
}

#[test]
fn tags_without_usable_primary_attribute_are_dropped() {
	let state = merged(vec![entry(
		"only",
		HeadProps {
			meta: vec![attrs(&[("content", "keyless")]), attrs(&[("name", ""), ("content", "empty key")])],
			link: vec![attrs(&[("rel", "stylesheet")])],
			..HeadProps::default()
		},
	)]);
	assert!(state.meta.is_empty());
	assert!(state.link.is_empty());
}

#[test]
fn encode_special_characters_resolves_innermost() {
	let state = merged(vec![
		entry("outer", HeadProps { encode_special_characters: Some(true), ..HeadProps::default() }),
		entry("inner", HeadProps { encode_special_characters: Some(false), ..HeadProps::default() }),
	]);
	assert!(!state.encode_special_characters);
}

#[test]
fn any_instance_enables_seo_prioritization() {
	let state = merged(vec![
		entry("outer", HeadProps { prioritize_seo_tags: true, ..HeadProps::default() }),
		entry(
			"inner",
			HeadProps {
				meta: vec![
					attrs(&[("name", "viewport"), ("content", "width=device-width")]),
					attrs(&[("name", "description"), ("content", "hello")]),
				],
				..HeadProps::default()
			},
		),
	]);

	let priority = state.priority.expect("prioritization should be active");
	assert_eq!(priority.meta, vec![attrs(&[("name", "description"), ("content", "hello")])]);
	assert_eq!(state.meta, vec![attrs(&[("name", "viewport"), ("content", "width=device-width")])]);
}

#[test]
fn unregistering_everything_returns_to_baseline() {
	let mut registry = vec![
		entry("a", HeadProps { title: Some("A".to_owned()), meta: vec![attrs(&[("name", "a"), ("content", "1")])], ..HeadProps::default() }),
		entry("b", HeadProps { title: Some("B".to_owned()), ..HeadProps::default() }),
	];
	registry.clear();
	let state = merged(registry);
	assert_eq!(state.title, None);
	assert!(state.meta.is_empty());
}
