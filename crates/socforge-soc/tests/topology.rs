//! Interconnect topology selection and finalize semantics.

use socforge_bus::{
    BusConfig, BusError, BusInterface, BusManager, BusStandard, Topology,
};
use socforge_locs::LocError;
use socforge_regions::{Region, RegionError};
use socforge_soc::{LocationSpace, SocConfig, SocError, SocResources};

fn wishbone() -> BusInterface {
    BusInterface::new(BusStandard::Wishbone, 32, 32)
}

#[test]
fn one_master_one_slave_at_zero_selects_point_to_point() {
    let mut soc = SocResources::new(SocConfig::default()).unwrap();
    soc.bus_mut().add_master(Some("cpu"), wishbone(), None).unwrap();
    soc.bus_mut()
        .add_slave(Some("ram"), wishbone(), Some(Region::at(0, 0x1_0000)), false)
        .unwrap();

    let plan = soc.finalize().unwrap();
    assert_eq!(
        plan.topology,
        Topology::PointToPoint {
            master: "cpu".into(),
            slave: "ram".into()
        }
    );
    // Direct wiring carries no decoder and no timeout counter.
    assert_eq!(plan.timeout, None);
}

#[test]
fn two_masters_three_slaves_select_a_decoded_interconnect() {
    let mut soc = SocResources::new(SocConfig::default()).unwrap();
    let bus = soc.bus_mut();
    bus.add_master(Some("cpu"), wishbone(), None).unwrap();
    bus.add_master(Some("dma"), wishbone(), None).unwrap();

    let layout = [
        ("rom", 0x0000_0000u64, 0x8000u64),
        ("ram", 0x4000_0000, 0x1_0000),
        ("uart", 0x8000_0000, 0x1000),
    ];
    for (name, origin, size) in layout {
        bus.add_slave(Some(name), wishbone(), Some(Region::at(origin, size)), false)
            .unwrap();
    }

    let plan = soc.finalize().unwrap();
    let Topology::Shared { masters, slaves } = &plan.topology else {
        panic!("expected a shared interconnect, got {:?}", plan.topology);
    };
    assert_eq!(masters.len(), 2);
    assert_eq!(slaves.len(), 3);

    // Each slave's decoder accepts its own range and nothing else's.
    for binding in slaves {
        for (name, origin, size) in layout {
            let first_word = origin >> 2;
            let last_word = (origin + size - 1) >> 2;
            let own = binding.name == name;
            assert_eq!(binding.decode.matches(first_word), own);
            assert_eq!(binding.decode.matches(last_word), own);
        }
    }
}

#[test]
fn finalize_is_idempotent_and_freezes_every_collection() {
    let mut soc = SocResources::new(SocConfig::default()).unwrap();
    soc.irq_mut().enable();
    soc.bus_mut().add_master(Some("cpu"), wishbone(), None).unwrap();
    soc.bus_mut()
        .add_slave(Some("ram"), wishbone(), Some(Region::at(0, 0x1_0000)), false)
        .unwrap();
    soc.reserve_location(LocationSpace::Registers, "ctrl", None, false)
        .unwrap();

    let first = soc.finalize().unwrap().clone();
    let second = soc.finalize().unwrap().clone();
    assert_eq!(first, second);

    // Every space is read-only now.
    assert_eq!(
        soc.bus_mut().add_master(Some("late"), wishbone(), None).unwrap_err(),
        BusError::Finalized
    );
    assert_eq!(
        soc.reserve_location(LocationSpace::Registers, "late", None, false)
            .unwrap_err(),
        SocError::Loc(LocError::Frozen { kind: "CSR" })
    );
    assert_eq!(
        soc.reserve_location(LocationSpace::Interrupts, "late", None, false)
            .unwrap_err(),
        SocError::Loc(LocError::Frozen { kind: "IRQ" })
    );

    // Reservations made before the freeze are still readable.
    assert_eq!(soc.csr().pool().get("ctrl"), Some(0));
}

#[test]
fn registering_the_same_slave_twice_fails() {
    let mut soc = SocResources::new(SocConfig::default()).unwrap();
    soc.bus_mut()
        .add_slave(Some("uart"), wishbone(), Some(Region::at(0x4000_0000, 0x1000)), false)
        .unwrap();
    let err = soc
        .bus_mut()
        .add_slave(Some("uart"), wishbone(), Some(Region::at(0x5000_0000, 0x1000)), false)
        .unwrap_err();
    assert_eq!(
        err,
        BusError::Region(RegionError::DuplicateName {
            name: "uart".into()
        })
    );
}

#[test]
fn a_chip_may_run_a_separate_dma_bus() {
    let mut soc = SocResources::new(SocConfig::default()).unwrap();
    soc.bus_mut().add_master(Some("cpu"), wishbone(), None).unwrap();
    soc.bus_mut()
        .add_slave(Some("ram"), wishbone(), Some(Region::at(0x4000_0000, 0x1_0000)), false)
        .unwrap();

    // The coherent DMA bus is its own namespace with its own standard.
    let mut dma_bus = BusManager::new(BusConfig {
        standard: BusStandard::Axi,
        ..BusConfig::default()
    })
    .unwrap();
    dma_bus
        .add_slave(
            Some("dma"),
            BusInterface::new(BusStandard::Axi, 32, 32),
            Some(Region::at(0, 0x1_0000_0000)),
            false,
        )
        .unwrap();
    dma_bus
        .add_master(Some("sata"), BusInterface::new(BusStandard::Axi, 32, 32), None)
        .unwrap();

    let dma_plan = dma_bus.finalize().unwrap();
    assert_eq!(
        dma_plan.topology,
        Topology::PointToPoint {
            master: "sata".into(),
            slave: "dma".into()
        }
    );

    // Namespaces are independent: both own a region named "dma"/"ram"
    // without clashing, and finalizing one leaves the other open.
    soc.bus_mut()
        .add_slave(Some("uart"), wishbone(), Some(Region::at(0x8000_0000, 0x1000)), false)
        .unwrap();
    soc.finalize().unwrap();
}
