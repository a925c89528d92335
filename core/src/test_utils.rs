use one_or_many::OneOrMany;
use proptest::prelude::*;
use waxlog_types::{Artist, Id, Reference, Release, ReleaseType, Review, Stars, UserRef};

pub fn artist(id: &str, name: &str, genre: &str) -> Artist {
    Artist {
        id: Id::from(id),
        name: name.into(),
        genre: genre.into(),
        country: String::new(),
        formed_year: None,
        biography: String::new(),
        image: None,
        user: Some(UserRef::Unresolved(Id::from("owner"))),
        releases: Vec::new(),
    }
}

/// A release whose artist hasn't been resolved.
pub fn release(id: &str, title: &str, year: i32, genre: &str) -> Release {
    Release {
        id: Id::from(id),
        title: title.into(),
        year,
        genre: genre.into(),
        release_type: ReleaseType::Album,
        image: None,
        track_list: Vec::new(),
        user: Some(UserRef::Unresolved(Id::from("owner"))),
        artist: Reference::Unresolved(Id::from(format!("artist-of-{id}"))),
        reviews: OneOrMany::None,
    }
}

pub fn resolved_release(id: &str, title: &str, artist: Artist) -> Release {
    Release {
        artist: Reference::Resolved(Box::new(artist)),
        ..release(id, title, 2000, "Electronic")
    }
}

pub fn review(id: &str, stars: u8, author: &str) -> Review {
    Review {
        id: Id::from(id),
        stars: Stars::new(stars).unwrap(),
        text: format!("review {id}"),
        favourite_track: None,
        user: Some(UserRef::Unresolved(Id::from(author))),
    }
}

/// `n` releases titled `Release 01`, `Release 02`, ... so title order is insertion order.
pub fn numbered_releases(n: usize) -> Vec<Release> {
    (1..=n)
        .map(|i| release(&i.to_string(), &format!("Release {i:02}"), 2000, "Dub"))
        .collect()
}

prop_compose! {
    pub fn arb_artist()(
        id in "[a-z0-9]{8}",
        name in "[A-Za-z ]{1,12}",
        genre in "[A-Za-z]{1,8}",
    ) -> Artist {
        artist(&id, &name, &genre)
    }
}

prop_compose! {
    pub fn arb_release()(
        id in "[a-z0-9]{8}",
        title in "[A-Za-z ]{1,12}",
        year in 1950i32..2030,
        genre in "[A-Za-z]{1,8}",
        artist in proptest::option::of(arb_artist()),
    ) -> Release {
        let mut release = release(&id, &title, year, &genre);
        if let Some(artist) = artist {
            release.artist = Reference::Resolved(Box::new(artist));
        }
        release
    }
}
