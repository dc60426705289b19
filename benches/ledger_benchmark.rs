use criterion::{criterion_group, criterion_main, Criterion};
use rewear::models::{Item, ItemStatus, Swap, SwapStatus, SwapType, User};
use rewear::services::items::price_for;
use rewear::services::swaps::plan_completion;
use std::hint::black_box;

const NOW: &str = "2026-01-01T00:00:00.000Z";

fn user(id: &str, points: u32) -> User {
    User {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        password_hash: String::new(),
        first_name: "Bench".to_string(),
        last_name: "User".to_string(),
        avatar_url: None,
        bio: None,
        location: None,
        points,
        rating: 5.0,
        total_swaps: 12,
        is_admin: false,
        created_at: NOW.to_string(),
        updated_at: NOW.to_string(),
    }
}

fn item(id: &str, owner: &str) -> Item {
    Item {
        id: id.to_string(),
        user_id: owner.to_string(),
        title: "Wool overcoat".to_string(),
        description: "Charcoal, single-breasted".to_string(),
        category: "Outerwear".to_string(),
        garment_type: "Coat".to_string(),
        size: "L".to_string(),
        condition: "Excellent".to_string(),
        points: price_for("Outerwear", "Excellent"),
        tags: vec!["wool".to_string(), "winter".to_string()],
        images: vec![],
        status: ItemStatus::Approved,
        available: true,
        views: 40,
        likes: 3,
        rejection_reason: None,
        created_at: NOW.to_string(),
        updated_at: NOW.to_string(),
    }
}

fn benchmark_plan_completion(c: &mut Criterion) {
    let requester = user("requester", 500);
    let owner = user("owner", 20);
    let wanted = item("wanted", "owner");
    let offered = item("offered", "requester");

    let redeem = Swap {
        id: "redeem".to_string(),
        kind: SwapType::Redeem,
        status: SwapStatus::Approved,
        requester_id: requester.id.clone(),
        owner_id: owner.id.clone(),
        owner_item_id: wanted.id.clone(),
        requester_item_id: None,
        message: String::new(),
        points_used: Some(wanted.points),
        created_at: NOW.to_string(),
        updated_at: NOW.to_string(),
    };
    let swap = Swap {
        id: "swap".to_string(),
        kind: SwapType::Swap,
        requester_item_id: Some(offered.id.clone()),
        points_used: None,
        ..redeem.clone()
    };

    let mut group = c.benchmark_group("plan_completion");

    group.bench_function("redeem", |b| {
        b.iter(|| {
            plan_completion(
                black_box(&redeem),
                &requester,
                &owner,
                &wanted,
                None,
                NOW,
            )
        })
    });

    group.bench_function("item_swap_to_batch", |b| {
        b.iter(|| {
            plan_completion(
                black_box(&swap),
                &requester,
                &owner,
                &wanted,
                Some(&offered),
                NOW,
            )
            .map(|completion| completion.into_batch())
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_plan_completion);
criterion_main!(benches);
