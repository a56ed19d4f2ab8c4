//! Records shipped with the explorer.

use crate::{ConservationStatus, Coordinate, Geography, SpeciesId, SpeciesRecord};

const VANCE: &str = "Dr. Elara VANCE (Biogenesis Lab)";
const WONG: &str = "Prof. Lin WONG (Genetik Mühendisliği)";
const MUTLU: &str = "Dr. Serkan MUTLU (Ekolojik Sekanslama)";

struct Entry {
    id: &'static str,
    common_name: &'static str,
    scientific_name: &'static str,
    description: &'static str,
    match_score: u8,
    status: ConservationStatus,
    center: (f64, f64),
    zoom: u8,
    regions: &'static [&'static str],
    sequence: &'static str,
    researcher: &'static str,
    threat_level: u8,
}

const ENTRIES: [Entry; 12] = [
    Entry {
        id: "TR-001",
        common_name: "Fıstık Çamı",
        scientific_name: "Pinus pinea",
        description: "Batı Anadolu’da yaygın, yenilebilir tohumları değerli. Akdeniz iklimi tipi. Ağacın DNA sekansı 12. kromozomda güçlü bir koruma geni gösteriyor.",
        match_score: 98,
        status: ConservationStatus::LeastConcern,
        center: (38.41, 27.14),
        zoom: 8,
        regions: &["İzmir", "Aydın", "Manisa", "Muğla"],
        sequence: "ATGACATGCCGGTATTCGGCATGCGCAGTACGTGACTCCGGTATT",
        researcher: VANCE,
        threat_level: 1,
    },
    Entry {
        id: "TR-002",
        common_name: "Anadolu Kestanesi",
        scientific_name: "Castanea sativa",
        description: "Marmara ve Karadeniz bölgelerinde yoğunlaşan önemli bir tür. Kabuk yapısı yüksek tanen içerir.",
        match_score: 99,
        status: ConservationStatus::NearThreatened,
        center: (40.78, 29.91),
        zoom: 7,
        regions: &["Bursa", "Kocaeli", "Sakarya", "Zonguldak"],
        sequence: "GGCCGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT",
        researcher: WONG,
        threat_level: 2,
    },
    Entry {
        id: "TR-003",
        common_name: "D. Karadeniz Göknarı",
        scientific_name: "Abies nordmanniana",
        description: "Yüksek rakımlı Karadeniz ormanlarının endemik türlerinden biri. Soğuk havaya dirençli genetik yapı.",
        match_score: 96,
        status: ConservationStatus::Endangered,
        center: (40.91, 39.81),
        zoom: 7,
        regions: &["Rize", "Trabzon", "Artvin"],
        sequence: "CCTTAAGGCCTTAAGGCCTTAAGGCCTTAAGGCCTTAAGGCCTTAA",
        researcher: MUTLU,
        threat_level: 4,
    },
    Entry {
        id: "TR-004",
        common_name: "İspir Meşesi",
        scientific_name: "Quercus libani",
        description: "Doğu Anadolu'nun zorlu koşullarına adapte olmuş nadir meşe türü. Kuraklığa dirençli gen dizilimi.",
        match_score: 85,
        status: ConservationStatus::Vulnerable,
        center: (40.38, 40.50),
        zoom: 7,
        regions: &["Erzurum", "Erzincan"],
        sequence: "AGTCAGTCAGTCAGTCAGTCAGTCAGTCAGTCAGTCAGTCAGTCAG",
        researcher: VANCE,
        threat_level: 3,
    },
    Entry {
        id: "TR-005",
        common_name: "Datça Hurması",
        scientific_name: "Phoenix theophrasti",
        description: "Türkiye'de doğal olarak yetişen tek palmiye türü, koruma altında. Çok küçük bir alanda yayılım gösterir.",
        match_score: 91,
        status: ConservationStatus::CriticallyEndangered,
        center: (36.73, 27.68),
        zoom: 9,
        regions: &["Muğla (Datça)"],
        sequence: "TTTTTTCCCCCGGGGGAAAAATTTTTCCCCCGGGGGAAAAA",
        researcher: WONG,
        threat_level: 5,
    },
    Entry {
        id: "TR-006",
        common_name: "Kaçkar Çiğdemi",
        scientific_name: "Crocus kağızmanicus",
        description: "Kaçkar Dağları'nın yüksek zirvelerinde bulunan endemik bir çiğdem türü. Kısa ömürlü DNA döngüsü.",
        match_score: 94,
        status: ConservationStatus::Endangered,
        center: (40.85, 40.75),
        zoom: 8,
        regions: &["Rize", "Artvin", "Erzurum"],
        sequence: "GCTAGCTAGCTAGCTAGCTAGCTAGCTAGCTAGCTAGCTAGCTAGC",
        researcher: MUTLU,
        threat_level: 4,
    },
    Entry {
        id: "TR-007",
        common_name: "Ters Lale",
        scientific_name: "Fritillaria imperialis",
        description: "Doğu ve Güneydoğu Anadolu'da yetişen, nadir ve soğanlı bir bitki türü. Genetik çeşitliliği azalıyor.",
        match_score: 88,
        status: ConservationStatus::Vulnerable,
        center: (37.75, 42.00),
        zoom: 7,
        regions: &["Hakkari", "Van", "Muş"],
        sequence: "ATCGGCTAATCGGCTAATCGGCTAATCGGCTAATCGGCTAATCGGC",
        researcher: VANCE,
        threat_level: 3,
    },
    Entry {
        id: "TR-008",
        common_name: "Kazdağı Göknarı",
        scientific_name: "Abies equi-trojani",
        description: "Sadece Kazdağları'nda (İda Dağı) yetişen bir endemik türdür. Kritik habitat koruması gereklidir.",
        match_score: 92,
        status: ConservationStatus::Endangered,
        center: (39.75, 26.85),
        zoom: 9,
        regions: &["Balıkesir", "Çanakkale"],
        sequence: "CGCGATATAGCGATATAGCGATATAGCGATATAGCGATATAGCGA",
        researcher: WONG,
        threat_level: 4,
    },
    Entry {
        id: "TR-009",
        common_name: "Kral Eğrelti Otu",
        scientific_name: "Osmunda regalis",
        description: "Nemli ve sulak alanlarda görülen büyük ve ihtişamlı bir eğrelti türü. Spor oluşum mekanizması inceleniyor.",
        match_score: 97,
        status: ConservationStatus::NearThreatened,
        center: (41.20, 31.00),
        zoom: 7,
        regions: &["Kastamonu", "Sinop", "Bolu"],
        sequence: "TAAGGCCTTAAGGCCTTAAGGCCTTAAGGCCTTAAGGCCTTAAGGC",
        researcher: MUTLU,
        threat_level: 2,
    },
    Entry {
        id: "TR-010",
        common_name: "Sığla Ağacı",
        scientific_name: "Liquidambar orientalis",
        description: "Sadece Türkiye ve Rodos'ta bulunan relikt endemik tür. Muğla ve Fethiye bölgesinde korunur.",
        match_score: 95,
        status: ConservationStatus::Vulnerable,
        center: (36.70, 28.50),
        zoom: 8,
        regions: &["Muğla", "Antalya"],
        sequence: "CGCGTATAGCGCGTATAGCGCGTATAGCGCGTATAGCGCGTATAGC",
        researcher: VANCE,
        threat_level: 3,
    },
    Entry {
        id: "TR-011",
        common_name: "Anadolu Kaplanı Orkidesi",
        scientific_name: "Ophrys anatolicum",
        description: "Orta Anadolu platolarında yaygın, ancak yasa dışı toplama tehdidi altında. Hassas genetik dizilim.",
        match_score: 89,
        status: ConservationStatus::NearThreatened,
        center: (39.00, 33.00),
        zoom: 6,
        regions: &["Ankara", "Konya", "Kayseri"],
        sequence: "CATGCATGCATGCATGCATGCATGCATGCATGCATGCATGCATGC",
        researcher: WONG,
        threat_level: 2,
    },
    Entry {
        id: "TR-012",
        common_name: "Harran Süseni",
        scientific_name: "Iris haussknechtii",
        description: "Şanlıurfa ve çevresinde yetişen, kısa dönemli çiçeklenme özelliğine sahip endemik süsen.",
        match_score: 84,
        status: ConservationStatus::CriticallyEndangered,
        center: (37.15, 39.00),
        zoom: 8,
        regions: &["Şanlıurfa", "Gaziantep"],
        sequence: "GCGGCGGCGGCGGCGGCGGCGGCGGCGGCGGCGGCGGCGGCGGCGGC",
        researcher: MUTLU,
        threat_level: 5,
    },
];

pub(crate) fn records() -> Vec<SpeciesRecord> {
    ENTRIES
        .iter()
        .map(|entry| SpeciesRecord {
            id: SpeciesId::new(entry.id),
            common_name: entry.common_name.to_string(),
            scientific_name: entry.scientific_name.to_string(),
            description: entry.description.to_string(),
            match_score: entry.match_score,
            conservation_status: entry.status,
            geography: Geography {
                center: Coordinate::new(entry.center.0, entry.center.1),
                zoom: entry.zoom,
                regions: entry.regions.iter().map(|region| (*region).to_string()).collect(),
            },
            genetic_sequence: entry.sequence.to_string(),
            researcher: entry.researcher.to_string(),
            threat_level: entry.threat_level,
        })
        .collect()
}
