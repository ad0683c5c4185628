use lota_core::game::outcome::MilestoneKind;
use lota_core::game::trial::{Trial, TrialPhase};
use lota_core::model::card::Card;
use lota_core::model::draw::{DrawOrder, NUMBER_COUNT};
use lota_core::stats::run_configuration_with_rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn adversarial_order(card: &Card) -> Vec<u8> {
    let mut numbers: Vec<u8> = (0..NUMBER_COUNT).filter(|n| !card.contains(*n)).collect();
    numbers.extend(card.numbers());
    numbers
}

#[test]
fn predicates_never_regress_while_marking() {
    let mut rng = StdRng::seed_from_u64(77);
    for _ in 0..100 {
        let mut card = Card::random(&mut rng);
        let order = DrawOrder::shuffled(&mut rng);
        let (mut pick, mut line, mut lota) = (false, false, false);

        for &number in order.numbers() {
            card.mark(number);
            let now = (card.has_pick(), card.has_line(), card.has_lota());
            assert!(!pick || now.0, "pick regressed");
            assert!(!line || now.1, "line regressed");
            assert!(!lota || now.2, "lota regressed");
            if now.2 {
                assert!(now.1, "lota without line");
            }
            if now.1 {
                assert!(now.0, "line without pick");
            }
            (pick, line, lota) = now;
        }

        assert!(lota, "a full draw order must complete the card");
    }
}

#[test]
fn milestone_turns_are_ordered_in_every_trial() {
    let mut rng = StdRng::seed_from_u64(4_096);
    for card_count in [1, 2, 5, 30] {
        for _ in 0..50 {
            let mut trial = Trial::random(card_count, &mut rng);
            let outcome = *trial.play();
            let pick = outcome.pick.expect("pick resolves");
            let line = outcome.line.expect("line resolves");
            let lota = outcome.lota.expect("lota resolves");
            assert!(pick.turn < line.turn);
            assert!(line.turn < lota.turn);
            assert!(lota.turn <= u32::from(NUMBER_COUNT));
            for milestone in [pick, line, lota] {
                assert!(milestone.winners >= 1);
                assert!(milestone.winners as usize <= card_count);
            }
            assert_eq!(trial.phase(), TrialPhase::Done);
            assert_eq!(trial.turns_played(), lota.turn);
        }
    }
}

#[test]
fn winners_match_cards_meeting_threshold_at_that_turn() {
    let mut rng = StdRng::seed_from_u64(13);
    let cards: Vec<Card> = (0..20).map(|_| Card::random(&mut rng)).collect();
    let order = DrawOrder::shuffled(&mut rng);

    let mut trial = Trial::with_parts(order.clone(), cards.clone());
    let outcome = *trial.play();

    for kind in MilestoneKind::ORDERED {
        let milestone = outcome.get(kind).expect("resolves");
        let mut replay = cards.clone();
        for &number in &order.numbers()[..milestone.turn as usize] {
            for card in &mut replay {
                card.mark(number);
            }
        }
        let reached = replay.iter().filter(|card| kind.is_reached(card)).count();
        assert_eq!(reached as u32, milestone.winners, "{}", kind.as_str());
    }
}

#[test]
fn card_numbers_drawn_last_still_complete_at_final_turn() {
    let mut rng = StdRng::seed_from_u64(5);
    let card = Card::random(&mut rng);
    let numbers = adversarial_order(&card);
    let first_card_turn = (numbers.len() - card.numbers().count() + 1) as u32;

    let order = DrawOrder::from_numbers(numbers).expect("valid order");
    let mut trial = Trial::with_parts(order, vec![card]);
    let outcome = *trial.play();

    assert_eq!(outcome.pick.map(|m| m.turn), Some(first_card_turn));
    assert_eq!(outcome.lota.map(|m| m.turn), Some(u32::from(NUMBER_COUNT)));
}

#[test]
fn truncated_order_reports_lota_as_never() {
    let mut rng = StdRng::seed_from_u64(6);
    let card = Card::random(&mut rng);
    let mut numbers = adversarial_order(&card);
    numbers.pop();

    let order = DrawOrder::from_numbers(numbers).expect("valid order");
    let mut trial = Trial::with_parts(order, vec![card]);
    let outcome = *trial.play();

    assert!(outcome.pick.is_some());
    assert!(outcome.line.is_some());
    assert_eq!(outcome.lota, None);
    assert_eq!(trial.phase(), TrialPhase::AwaitingLota);
}

#[test]
fn many_cards_pick_on_the_first_draws() {
    let mut rng = StdRng::seed_from_u64(250);
    let stats = run_configuration_with_rng(250, 1_000, &mut rng).expect("run");
    let mean_pick = stats.pick.mean_turn.expect("pick resolves");
    assert!((1.0..=2.0).contains(&mean_pick), "mean pick turn {mean_pick}");
    assert_eq!(stats.pick.p90_turn, Some(1));
    assert!(stats.line_collision_rate > 0.0);
}
