// Integration tests for shelfmatch
use shelfmatch_core::{
    tally_titles, BookRecord, Error, InMemoryCorpus, Preference, Recommender, RecommenderConfig,
    TextField,
};
use shelfmatch_storage::CsvCorpus;
use std::sync::Arc;

fn dune_library() -> Vec<BookRecord> {
    vec![
        BookRecord::new("A")
            .with_title("Dune")
            .with_authors("Herbert")
            .with_categories("SciFi")
            .with_year(1965)
            .with_rating(4.5),
        BookRecord::new("B")
            .with_title("Dune Messiah")
            .with_authors("Herbert")
            .with_categories("SciFi")
            .with_year(1969)
            .with_rating(4.0),
        BookRecord::new("C")
            .with_title("Emma")
            .with_authors("Austen")
            .with_categories("Romance")
            .with_year(1815)
            .with_rating(4.2),
    ]
}

fn mixed_library() -> Vec<BookRecord> {
    vec![
        BookRecord::new("9780441172719")
            .with_title("Dune")
            .with_authors("Frank Herbert")
            .with_categories("Fiction, Science Fiction")
            .with_description("A desert planet, spice, and a messianic heir")
            .with_year(1965)
            .with_rating(4.25),
        BookRecord::new("9780547928227")
            .with_title("The Hobbit")
            .with_authors("J. R. R. Tolkien")
            .with_categories("Fantasy")
            .with_description("A hobbit is swept into a quest with dwarves and a dragon")
            .with_year(1937)
            .with_rating(4.28),
        BookRecord::new("9780618640157")
            .with_title("The Lord of the Rings")
            .with_authors("J. R. R. Tolkien")
            .with_categories("Fantasy")
            .with_description("The quest to destroy the one ring")
            .with_year(1954)
            .with_rating(4.5),
        BookRecord::new("9780141439518")
            .with_title("Pride and Prejudice")
            .with_authors("Jane Austen")
            .with_categories("Fiction, Romance")
            .with_description("Manners, marriage and misjudgement in Regency England")
            .with_year(1813)
            .with_rating(4.28),
        BookRecord::new("9780553293357")
            .with_title("Foundation")
            .with_authors("Isaac Asimov")
            .with_categories("Science Fiction")
            .with_description("Psychohistory predicts the fall of a galactic empire")
            .with_year(1951)
            .with_rating(4.17),
        // Sparse metadata: no year, no rating, no description
        BookRecord::new("9780000000002").with_title("Untitled Notebook"),
    ]
}

#[test]
fn test_similar_example_ranking() {
    let rec = Recommender::with_defaults(InMemoryCorpus::new(dune_library()));
    let results = rec.recommend_similar("A", 2).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0.id, "B");
    assert_eq!(results[1].0.id, "C");
}

#[test]
fn test_preference_example() {
    let rec = Recommender::with_defaults(InMemoryCorpus::new(dune_library()));
    let pref = Preference::new()
        .with_category("SciFi")
        .with_min_rating(4.0)
        .with_year_from(1960);

    let results = rec.recommend_by_preference(&pref, 1).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].0.id == "A" || results[0].0.id == "B");
}

#[test]
fn test_similar_properties_hold_for_every_item() {
    let books = mixed_library();
    let n = books.len();
    let rec = Recommender::with_defaults(InMemoryCorpus::new(books.clone()));

    for book in &books {
        for top_n in [1, 3, n - 1, n + 5] {
            let results = rec.recommend_similar(&book.id, top_n).unwrap();
            assert_eq!(results.len(), top_n.min(n - 1));
            assert!(results.iter().all(|(b, _)| b.id != book.id));
            assert!(results.windows(2).all(|w| w[0].1 >= w[1].1));
            assert!(results.iter().all(|(_, s)| (0.0..=1.0).contains(s)));
        }
    }
}

#[test]
fn test_same_author_ranks_high() {
    let rec = Recommender::with_defaults(InMemoryCorpus::new(mixed_library()));
    let results = rec.recommend_similar("9780547928227", 1).unwrap();
    assert_eq!(results[0].0.title(), "The Lord of the Rings");
}

#[test]
fn test_repeated_queries_are_identical() {
    let rec = Recommender::with_defaults(InMemoryCorpus::new(mixed_library()));
    let first = rec.recommend_similar("9780441172719", 4).unwrap();
    let second = rec.recommend_similar("9780441172719", 4).unwrap();
    assert_eq!(first, second);

    let pref = Preference::new().with_category("Fantasy");
    assert_eq!(
        rec.recommend_by_preference(&pref, 3).unwrap(),
        rec.recommend_by_preference(&pref, 3).unwrap()
    );
}

#[test]
fn test_empty_preference_is_best_effort() {
    let books = mixed_library();
    let rec = Recommender::with_defaults(InMemoryCorpus::new(books.clone()));

    let results = rec.recommend_by_preference(&Preference::new(), 4).unwrap();
    assert_eq!(results.len(), 4);

    let all = rec.recommend_by_preference(&Preference::new(), 100).unwrap();
    assert_eq!(all.len(), books.len());
    assert!(all.iter().all(|(_, d)| (0.0..=2.0).contains(d)));
    assert!(all.windows(2).all(|w| w[0].1 <= w[1].1));
}

#[test]
fn test_preference_with_unknown_category_still_ranks() {
    let rec = Recommender::with_defaults(InMemoryCorpus::new(mixed_library()));
    let pref = Preference::new().with_category("Cookbooks").with_year_from(1950);
    let results = rec.recommend_by_preference(&pref, 2).unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn test_refresh_adds_and_removes_items() {
    let corpus = InMemoryCorpus::new(mixed_library());
    let rec = Recommender::with_defaults(corpus);
    let before = rec.generation().unwrap();

    rec.source().upsert(
        BookRecord::new("9780261102354")
            .with_title("The Fellowship of the Ring")
            .with_authors("J. R. R. Tolkien")
            .with_categories("Fantasy")
            .with_year(1954)
            .with_rating(4.38),
    );
    rec.source().remove("9780553293357");

    // Not visible until refresh
    assert!(matches!(
        rec.recommend_similar("9780261102354", 3),
        Err(Error::ItemNotFound(_))
    ));

    let after = rec.refresh().unwrap();
    assert!(after.epoch() > before.epoch());
    assert_eq!(before.len(), 6);
    assert_eq!(after.len(), 6);

    let similar = rec.recommend_similar("9780261102354", 2).unwrap();
    assert!(similar.iter().all(|(b, _)| b.id != "9780553293357"));

    let pref = Preference::new().with_category("Fantasy").with_min_rating(4.3);
    let picks = rec.recommend_by_preference(&pref, 3).unwrap();
    assert!(picks.iter().any(|(b, _)| b.id == "9780261102354"));
    assert!(picks.iter().all(|(b, _)| b.id != "9780553293357"));

    // The old snapshot still answers consistently on its own terms
    assert!(before.book("9780553293357").is_some());
    assert!(before.similar_to("9780553293357", 2).is_ok());
}

#[test]
fn test_scoped_generation_outlives_refresh() {
    let rec = Arc::new(Recommender::with_defaults(InMemoryCorpus::new(mixed_library())));
    let pinned = rec.generation().unwrap();
    let expected = pinned.similar_to("9780441172719", 3).unwrap();

    rec.source().replace(dune_library());
    rec.refresh().unwrap();

    assert_eq!(pinned.similar_to("9780441172719", 3).unwrap(), expected);
    assert!(matches!(
        rec.recommend_similar("9780441172719", 3),
        Err(Error::ItemNotFound(_))
    ));
}

#[test]
fn test_concurrent_readers_and_refresh() {
    let rec = Arc::new(Recommender::with_defaults(InMemoryCorpus::new(mixed_library())));
    rec.refresh().unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let rec = rec.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let results = rec.recommend_similar("9780618640157", 3).unwrap();
                    assert_eq!(results.len(), 3);
                    let pref = Preference::new().with_category("Fantasy");
                    assert_eq!(rec.recommend_by_preference(&pref, 2).unwrap().len(), 2);
                }
            })
        })
        .collect();

    for _ in 0..10 {
        rec.refresh().unwrap();
    }
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_custom_text_fields() {
    let config = RecommenderConfig {
        text_fields: vec![TextField::Authors, TextField::Categories, TextField::Title],
        ..RecommenderConfig::default()
    };
    let rec = Recommender::new(InMemoryCorpus::new(mixed_library()), config).unwrap();
    let vocabulary = rec.generation().unwrap().model().tfidf().vocabulary_size();
    // No description words in the vocabulary
    assert!(rec.generation().unwrap().model().tfidf().term_index("psychohistory").is_none());
    assert!(vocabulary > 0);
}

#[test]
fn test_invalid_config_rejected() {
    let config = RecommenderConfig {
        text_fields: Vec::new(),
        ..RecommenderConfig::default()
    };
    assert!(matches!(
        Recommender::new(InMemoryCorpus::default(), config),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn test_categories_and_title_tally() {
    let rec = Recommender::with_defaults(InMemoryCorpus::new(mixed_library()));
    let categories = rec.categories().unwrap();
    assert_eq!(categories[0], ("Fiction".to_string(), 2));

    let a = rec.recommend_similar("9780547928227", 2).unwrap();
    let b = rec.recommend_similar("9780261102354", 2);
    assert!(b.is_err());
    let c = rec.recommend_similar("9780618640157", 2).unwrap();
    let tally = tally_titles([a.as_slice(), c.as_slice()], 10);
    assert!(!tally.is_empty());
    assert!(tally.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn test_csv_library_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.csv");
    let corpus = CsvCorpus::new(&path);
    corpus.save(&mixed_library()).unwrap();

    let rec = Recommender::with_defaults(CsvCorpus::new(&path));
    let results = rec.recommend_similar("9780618640157", 1).unwrap();
    assert_eq!(results[0].0.title(), "The Hobbit");

    // Rewrite the file with one more book and refresh
    let mut books = corpus.load().unwrap();
    books.push(
        BookRecord::new("9780261102361")
            .with_title("The Two Towers")
            .with_authors("J. R. R. Tolkien")
            .with_categories("Fantasy")
            .with_year(1954),
    );
    corpus.save(&books).unwrap();
    let generation = rec.refresh().unwrap();
    assert_eq!(generation.len(), 7);
}

#[test]
fn test_broken_csv_keeps_previous_generation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.csv");
    CsvCorpus::new(&path).save(&dune_library()).unwrap();

    let rec = Recommender::with_defaults(CsvCorpus::new(&path));
    let first = rec.refresh().unwrap();

    std::fs::write(&path, "isbn13,published_year\nX,not-a-year\n").unwrap();
    assert!(matches!(rec.refresh(), Err(Error::Corpus(_))));
    assert_eq!(rec.current().unwrap().epoch(), first.epoch());
    assert_eq!(rec.recommend_similar("A", 1).unwrap()[0].0.id, "B");
}

#[test]
fn test_preference_from_json() {
    let pref: Preference =
        serde_json::from_str(r#"{"categories": ["Fantasy"], "min_rating": 4.0}"#).unwrap();
    assert_eq!(pref.year_from, None);
    let rec = Recommender::with_defaults(InMemoryCorpus::new(mixed_library()));
    let results = rec.recommend_by_preference(&pref, 2).unwrap();
    assert!(results.iter().all(|(b, _)| b.categories() == "Fantasy"));
}
