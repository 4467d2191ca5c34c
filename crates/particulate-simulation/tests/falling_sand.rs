//! Integration tests for pouring and settling sand

use particulate_simulation::{Cell, CountingStats, NoopStats, Tool, World};

/// Step until nothing moves, returning the number of steps taken
fn settle(world: &mut World, max_steps: usize) -> usize {
    for steps in 0..max_steps {
        let mut stats = CountingStats::default();
        world.step(&mut stats);
        if stats.cells_moved == 0 {
            return steps;
        }
    }
    panic!("world did not settle within {max_steps} steps");
}

fn is_stable(world: &World, x: i32, y: i32) -> bool {
    let below = |dx: i32| world.get(x + dx, y + 1).map_or(true, |c| c == Cell::Sand);
    y + 1 >= world.height() as i32 || (below(0) && below(-1) && below(1))
}

#[test]
fn test_poured_sand_settles_into_a_pile() {
    let mut world = World::new(40, 30).unwrap();

    for _ in 0..60 {
        world.paint(20, 2, 2, Tool::Sand);
        world.step(&mut NoopStats);
    }
    let grains = world.count(Cell::Sand);
    assert!(grains > 0);

    settle(&mut world, 10_000);
    assert_eq!(world.count(Cell::Sand), grains);

    for y in 0..world.height() as i32 {
        for x in 0..world.width() as i32 {
            if world.get(x, y) == Some(Cell::Sand) {
                assert!(is_stable(&world, x, y), "grain at ({x}, {y}) can still move");
            }
        }
    }

    // The pile rests on the floor and is tallest near where it was poured
    let column_height = |x: i32| {
        (0..world.height() as i32)
            .filter(|&y| world.get(x, y) == Some(Cell::Sand))
            .count()
    };
    assert!(column_height(20) > 0);
    assert!(column_height(19) >= column_height(5));
    assert!(column_height(20) >= column_height(35));
}

#[test]
fn test_erasing_under_a_pile_lets_it_fall_again() {
    let mut world = World::new(20, 20).unwrap();
    for y in 10..20 {
        for x in 8..12 {
            world.set(x, y, Cell::Sand);
        }
    }
    settle(&mut world, 1_000);
    let grains = world.count(Cell::Sand);

    // Scoop out the bottom of the column
    world.paint(10, 18, 4, Tool::Erase);
    assert!(world.count(Cell::Sand) < grains);

    let mut stats = CountingStats::default();
    world.step(&mut stats);
    assert!(stats.cells_moved > 0);
}
