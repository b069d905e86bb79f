//! End-to-end image programming against the emulated bootloader

use no2flash_core::bootloader::{Bootloader, ProtocolVersion};
use no2flash_core::flash::{self, FlashProgress, NoProgress, WriteStats};
use no2flash_core::protocol::WaitPolicy;
use no2flash_core::Error;
use no2flash_dummy::{DummyBootloader, DummyConfig};

fn open() -> Bootloader<DummyBootloader> {
    Bootloader::new(DummyBootloader::new_default()).unwrap()
}

#[derive(Debug, PartialEq, Eq)]
enum Event {
    Erasing(u32),
    Programming(u32),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
    completed: Option<WriteStats>,
}

impl FlashProgress for Recorder {
    fn erasing(&mut self, addr: u32) {
        self.events.push(Event::Erasing(addr));
    }

    fn programming(&mut self, addr: u32) {
        self.events.push(Event::Programming(addr));
    }

    fn complete(&mut self, stats: &WriteStats) {
        self.completed = Some(*stats);
    }
}

#[test]
fn single_sector_image() {
    let mut bl = open();
    let image = vec![0xAA; 4096];

    let stats =
        flash::program_image(&mut bl, 0, &image, &WaitPolicy::default(), &mut NoProgress).unwrap();

    assert_eq!(stats.sectors_erased, 1);
    assert_eq!(stats.pages_programmed, 16);

    let dummy = bl.transport();
    assert_eq!(dummy.erases(), vec![0]);
    let programs = dummy.programs();
    assert_eq!(programs.len(), 16);
    for (i, (addr, data)) in programs.iter().enumerate() {
        assert_eq!(*addr, (i * 256) as u32);
        assert_eq!(data.len(), 256);
    }
    assert_eq!(&dummy.data()[..4096], &image[..]);
    assert_eq!(dummy.data()[4096], 0xFF);
}

#[test]
fn partial_page_is_zero_padded() {
    let mut bl = open();
    let image: Vec<u8> = (0..300).map(|i| (i % 251) as u8 | 0x01).collect();

    flash::program_image(&mut bl, 0x10000, &image, &WaitPolicy::default(), &mut NoProgress)
        .unwrap();

    let dummy = bl.transport();
    assert_eq!(dummy.erases(), vec![0x10000]);

    let programs = dummy.programs();
    assert_eq!(programs.len(), 2);
    assert_eq!(programs[0].0, 0x10000);
    assert_eq!(programs[0].1, image[..256]);
    assert_eq!(programs[1].0, 0x10100);
    assert_eq!(programs[1].1.len(), 256);
    assert_eq!(programs[1].1[..44], image[256..]);
    assert!(programs[1].1[44..].iter().all(|&b| b == 0));

    assert_eq!(&dummy.data()[0x10000..0x10000 + 300], &image[..]);
    assert!(dummy.data()[0x10000 + 300..0x10200].iter().all(|&b| b == 0));
}

#[test]
fn two_sector_image_erases_each_boundary() {
    let mut bl = open();
    let image = vec![0x5A; 8192];
    let mut progress = Recorder::default();

    flash::program_image(&mut bl, 0x1000, &image, &WaitPolicy::default(), &mut progress)
        .unwrap();

    assert_eq!(bl.transport().erases(), vec![0x1000, 0x2000]);
    assert_eq!(bl.transport().programs().len(), 32);

    // Each erase comes right before the first page of its sector
    assert_eq!(progress.events[0], Event::Erasing(0x1000));
    assert_eq!(progress.events[1], Event::Programming(0x1000));
    assert_eq!(progress.events[17], Event::Erasing(0x2000));
    assert_eq!(progress.events[18], Event::Programming(0x2000));
    assert_eq!(progress.events.len(), 34);
    assert_eq!(
        progress.completed,
        Some(WriteStats {
            sectors_erased: 2,
            pages_programmed: 32,
            image_bytes: 8192,
        })
    );
}

#[test]
fn unaligned_base_sends_nothing() {
    let mut bl = open();
    let before = bl.transport().transfers();

    let err = flash::program_image(
        &mut bl,
        0x0800,
        &[0u8; 16],
        &WaitPolicy::default(),
        &mut NoProgress,
    )
    .unwrap_err();

    assert_eq!(err, Error::InvalidAlignment { addr: 0x0800 });
    assert_eq!(bl.transport().transfers(), before);
}

#[test]
fn empty_image_is_a_no_op() {
    let mut bl = open();
    let before = bl.transport().transfers();

    let stats =
        flash::program_image(&mut bl, 0, &[], &WaitPolicy::default(), &mut NoProgress).unwrap();

    assert_eq!(stats, WriteStats::default());
    assert_eq!(bl.transport().transfers(), before);
}

#[test]
fn unsupported_version_is_rejected() {
    let dummy = DummyBootloader::new(DummyConfig {
        version: ProtocolVersion::new(2, 0),
        ..Default::default()
    });

    match Bootloader::new(dummy) {
        Err(err) => assert_eq!(err, Error::UnsupportedVersion { major: 2, minor: 0 }),
        Ok(_) => panic!("version 2.0 accepted"),
    }
}

#[test]
fn transport_failure_aborts_write() {
    let mut bl = open();
    bl.transport_mut().fail_after(50);

    let err = flash::program_image(
        &mut bl,
        0,
        &vec![0x00; 8192],
        &WaitPolicy::default(),
        &mut NoProgress,
    )
    .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    let dummy = bl.transport();
    assert_eq!(dummy.erases(), vec![0]);
    assert!(dummy.programs().len() < 16);
    assert!(dummy.data()[0x1000..0x2000].iter().all(|&b| b == 0xFF));
}

#[test]
fn bounded_wait_times_out_on_slow_chip() {
    let dummy = DummyBootloader::new(DummyConfig {
        busy_polls: 10,
        ..Default::default()
    });
    let mut bl = Bootloader::new(dummy).unwrap();
    let policy = WaitPolicy::default().with_max_polls(3);

    let err = flash::program_image(&mut bl, 0, &[0u8; 16], &policy, &mut NoProgress).unwrap_err();
    assert_eq!(err, Error::Timeout { polls: 3 });
}

#[test]
fn erase_then_read_back() {
    let mut initial = vec![0x00; 0x3000];
    initial[0x2FFF] = 0x42;
    let dummy = DummyBootloader::with_data(DummyConfig::default(), &initial);
    let mut bl = Bootloader::new(dummy).unwrap();

    let stats =
        flash::erase_range(&mut bl, 0x1000, 0x1001, &WaitPolicy::default(), &mut NoProgress)
            .unwrap();
    assert_eq!(stats.sectors_erased, 2);
    assert_eq!(bl.transport().erases(), vec![0x1000, 0x2000]);

    let mut buf = vec![0u8; 0x3000];
    flash::read_range(&mut bl, 0, &mut buf, 1000, &mut NoProgress).unwrap();
    assert!(buf[..0x1000].iter().all(|&b| b == 0x00));
    assert!(buf[0x1000..].iter().all(|&b| b == 0xFF));

    assert_eq!(flash::read_flash(&mut bl, 0x0FFE, 4).unwrap(), vec![0x00, 0x00, 0xFF, 0xFF]);
}
